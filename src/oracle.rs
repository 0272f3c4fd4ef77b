//! Optional external type source consulted during symbol resolution.
//!
//! The resolver fills missing parameter and return types from an oracle
//! when neither the doc tags nor the declaration syntax provide them.

/// A function signature as reported by an oracle.
#[derive(Debug, Clone, Default)]
pub struct FunctionSignature {
    pub params: Vec<OracleParam>,
    pub returns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OracleParam {
    pub name: String,
    pub ty: String,
}

impl FunctionSignature {
    /// Look up a parameter type by name.
    pub fn param_type_for(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ty.as_str())
    }
}

/// A rendered type for one member: a display string, plus a structured
/// signature when the member is a function.
#[derive(Debug, Clone, Default)]
pub struct RenderedType {
    pub display: String,
    pub function: Option<FunctionSignature>,
}

/// Answers type queries for members of an owner path. Implementations
/// may be backed by a type checker, a cache, or nothing at all.
pub trait TypeOracle {
    fn resolve(&self, owner_path: &[String], member: &str, is_method: bool)
    -> Option<RenderedType>;
}

/// Oracle that knows nothing. Resolution falls back to doc tags and
/// declaration syntax alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOracle;

impl TypeOracle for NoOracle {
    fn resolve(&self, _: &[String], _: &str, _: bool) -> Option<RenderedType> {
        None
    }
}
