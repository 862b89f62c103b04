//! Validating tables before serialization

use std::fmt;

use sfnt_types::Tag;

/// A type that can validate itself before being serialized.
///
/// Validation failures are collected, not returned eagerly, so that a
/// caller sees every problem at once.
pub trait Validate {
    fn validate_impl(&self, ctx: &mut ValidationCtx);

    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport {
                messages: ctx.messages,
            })
        }
    }
}

/// Accumulated validation state.
#[derive(Debug, Default)]
pub struct ValidationCtx {
    location: Vec<String>,
    messages: Vec<String>,
}

impl ValidationCtx {
    pub fn in_table<R>(&mut self, tag: Tag, f: impl FnOnce(&mut ValidationCtx) -> R) -> R {
        self.location.push(tag.to_string());
        let r = f(self);
        self.location.pop();
        r
    }

    pub fn in_field<R>(&mut self, name: &str, f: impl FnOnce(&mut ValidationCtx) -> R) -> R {
        self.location.push(name.to_string());
        let r = f(self);
        self.location.pop();
        r
    }

    pub fn report(&mut self, message: impl fmt::Display) {
        if self.location.is_empty() {
            self.messages.push(message.to_string());
        } else {
            self.messages
                .push(format!("{}: {message}", self.location.join(".")));
        }
    }

    /// Report when `value` does not fit in a u16 field.
    pub fn check_u16_len(&mut self, name: &str, value: usize) {
        if value > u16::MAX as usize {
            self.in_field(name, |ctx| ctx.report("value exceeds u16::MAX"));
        }
    }
}

/// One or more problems found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub messages: Vec<String>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} validation failures:", self.messages.len())?;
        for message in &self.messages {
            writeln!(f, "  {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysBad;

    impl Validate for AlwaysBad {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_table(Tag::new(b"hmtx"), |ctx| {
                ctx.in_field("advance", |ctx| ctx.report("no good"))
            });
        }
    }

    #[test]
    fn location_prefixes() {
        let report = AlwaysBad.validate().unwrap_err();
        assert_eq!(report.messages, vec!["hmtx.advance: no good"]);
    }
}
