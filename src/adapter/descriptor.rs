//! Identity of a hidden begin/end operation

use std::fmt;

/// How the hidden request reports per-item failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorHandling {
    /// Failures come back inside the response collection.
    #[default]
    ReturnErrors,
    /// The end primitive raises on the first failed item.
    ThrowOnError,
}

/// Names everything discovery has to find for one operation: the hidden
/// request type, its settable input fields in assignment order, and the
/// begin/end primitives.
///
/// Descriptors are plain values. Two equal descriptors share one cached
/// adapter.
///
/// # Examples
///
/// ```
/// use groupware_mail::adapter::OperationDescriptor;
///
/// let d = OperationDescriptor::new("CreateItemRequest")
///     .field("ParentFolderId")
///     .field("Items");
/// assert_eq!(d.fields(), ["ParentFolderId", "Items"]);
/// assert_eq!(d.begin_name(), "BeginExecute");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    request_type: String,
    fields: Vec<String>,
    begin: String,
    end: String,
    error_handling: ErrorHandling,
}

impl OperationDescriptor {
    #[must_use]
    pub fn new(request_type: impl Into<String>) -> Self {
        Self {
            request_type: request_type.into(),
            fields: Vec::new(),
            begin: "BeginExecute".to_string(),
            end: "EndExecute".to_string(),
            error_handling: ErrorHandling::default(),
        }
    }

    /// Append an input field. Fields are assigned in the order added.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    #[must_use]
    pub fn begin(mut self, name: impl Into<String>) -> Self {
        self.begin = name.into();
        self
    }

    #[must_use]
    pub fn end(mut self, name: impl Into<String>) -> Self {
        self.end = name.into();
        self
    }

    #[must_use]
    pub const fn error_handling(mut self, mode: ErrorHandling) -> Self {
        self.error_handling = mode;
        self
    }

    #[must_use]
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn begin_name(&self) -> &str {
        &self.begin
    }

    #[must_use]
    pub fn end_name(&self) -> &str {
        &self.end
    }

    #[must_use]
    pub const fn error_handling_mode(&self) -> ErrorHandling {
        self.error_handling
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}/{}({})",
            self.request_type,
            self.begin,
            self.end,
            self.fields.join(", ")
        )
    }
}
