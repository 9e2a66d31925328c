//! Parameter names for generated functions.

use std::collections::HashSet;

use gobok_core::to_lower_camel;
use gobok_syntax::is_keyword;

/// Receiver name of every builder method.
pub const RECEIVER: &str = "b";

/// Hands out parameter names that compile inside one function.
///
/// Names start as the lower-camel field name. Keywords, reserved names and
/// names already handed out get a `Value` suffix, then a number.
#[derive(Debug)]
pub struct ParamNames {
    taken: HashSet<String>,
}

impl ParamNames {
    /// `reserved` are names the function body refers to, such as the
    /// receiver or the struct type.
    pub fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn name_for(&mut self, field: &str) -> String {
        let base = to_lower_camel(field);
        let mut candidate = if is_keyword(&base) {
            format!("{base}Value")
        } else {
            base.clone()
        };
        let mut n = 1;
        while self.taken.contains(&candidate) {
            candidate = if n == 1 {
                format!("{base}Value")
            } else {
                format!("{base}Value{n}")
            };
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
