use recpack_codec::Record;
use recpack_layout::Layout;

/// Failure reported by a record handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<recpack_codec::CodecError> for HandlerError {
    fn from(err: recpack_codec::CodecError) -> Self {
        Self::new(err.to_string())
    }
}

/// Callee-side logic invoked with one decoded record.
///
/// The returned record is packed with the same layout as the request, so it
/// must keep the request's shape.
pub trait RecordHandler: Send + Sync {
    fn handle(&self, layout: &Layout, record: Record) -> Result<Record, HandlerError>;
}

impl<F> RecordHandler for F
where
    F: Fn(&Layout, Record) -> Result<Record, HandlerError> + Send + Sync,
{
    fn handle(&self, layout: &Layout, record: Record) -> Result<Record, HandlerError> {
        self(layout, record)
    }
}

#[cfg(test)]
mod tests {
    use recpack_codec::{record, Value};
    use recpack_layout::describe_layout;

    use super::*;

    struct Negate;

    impl RecordHandler for Negate {
        fn handle(&self, _layout: &Layout, record: Record) -> Result<Record, HandlerError> {
            record
                .into_iter()
                .map(|value| match value {
                    Value::Int32(v) => v
                        .checked_neg()
                        .map(Value::Int32)
                        .ok_or_else(|| HandlerError::new("overflow")),
                    other => Ok(other),
                })
                .collect()
        }
    }

    #[test]
    fn struct_handler() {
        let layout = describe_layout("ii").unwrap();
        let out = Negate.handle(&layout, record![1i32, -2i32]).unwrap();
        assert_eq!(out, record![-1i32, 2i32]);

        let err = Negate.handle(&layout, record![i32::MIN, 0i32]).unwrap_err();
        assert_eq!(err.message(), "overflow");
    }

    #[test]
    fn closure_handler() {
        let layout = describe_layout("h").unwrap();
        let handler = |layout: &Layout, record: Record| -> Result<Record, HandlerError> {
            assert_eq!(layout.field_count(), record.len());
            Ok(record)
        };
        let out = handler.handle(&layout, record![5i16]).unwrap();
        assert_eq!(out, record![5i16]);
    }

    #[test]
    fn error_conversions() {
        assert_eq!(HandlerError::from("x").to_string(), "x");
        assert_eq!(HandlerError::from(String::from("y")).message(), "y");
        let codec = recpack_codec::CodecError::ArityMismatch {
            expected: 1,
            actual: 0,
        };
        assert!(HandlerError::from(codec).message().contains("expects 1"));
    }
}
