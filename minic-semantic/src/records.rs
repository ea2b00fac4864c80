use minic_core::Location;
use minic_syntax::TypeName;
use serde::Serialize;

/// A variable declared at file scope, as reported to the driver.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GlobalVariable {
    pub name: String,
    pub declared_type: TypeName,
    /// Source text of the initializer run, empty when none was present.
    pub initializer: String,
    pub location: Location,
}

/// Everything the pipeline records about one function declaration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type: TypeName,
    /// Source text between the parentheses, e.g. `"int a, float b"`.
    pub parameters: String,
    pub is_recursive: bool,
    pub local_variables: Vec<String>,
    /// Control-structure keywords in body order (`if`, `else`, `while`, `for`).
    pub control_structures: Vec<String>,
    pub location: Location,
}
