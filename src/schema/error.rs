/// Errors raised while deriving a JSON Schema from a parameter table
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A parameter kind that cannot be expressed as a schema property
    #[error("Cannot introspect '{owner}': parameter '{parameter}' is {kind}")]
    UnsupportedParameterKind {
        /// Class or method that declares the parameter
        owner: String,
        /// Parameter name
        parameter: String,
        /// Human-readable parameter kind
        kind: &'static str,
    },

    /// A structured object type that (transitively) embeds itself
    #[error("Cyclic class reference while building schema: {0}")]
    CyclicReference(String),

    /// A generated schema violates the required-subset-of-properties rule
    #[error("Schema '{tag}' lists required field '{field}' without a matching property")]
    DanglingRequired {
        /// Tag of the offending schema
        tag: String,
        /// Required field with no property
        field: String,
    },
}
