//! Derived queries: variables, steps and plays.

use factum_core::{
    FactTypeId, ObjectTypeId, PlayId, QueryId, RoleId, StepId, UnitId, Value, VariableId,
};

/// A derived query over one or more fact types.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub variables: Vec<VariableId>,
    pub steps: Vec<StepId>,
}

/// One variable of a query, standing for a binding's role player.
#[derive(Debug, Clone)]
pub struct Variable {
    pub query: QueryId,
    pub ordinal: u16,
    pub object_type: ObjectTypeId,
    /// Role name carried over from the binding, if any.
    pub role_name: Option<String>,
    /// Fixed literal value, when the binding was a literal.
    pub value: Option<Value>,
    /// Unit of the literal value, if one was named.
    pub unit: Option<UnitId>,
}

/// One step of a query, traversing a fact type.
#[derive(Debug, Clone)]
pub struct Step {
    pub query: QueryId,
    pub ordinal: u16,
    pub fact_type: FactTypeId,
    /// The step must not hold (negated clause).
    pub is_disallowed: bool,
    /// The step may hold (uncertain clause).
    pub is_optional: bool,
    /// Variable objectifying this step's fact type, if any.
    pub objectification_variable: Option<VariableId>,
    pub plays: Vec<PlayId>,
}

/// One role occurrence within a step, linking a role to a variable.
#[derive(Debug, Clone)]
pub struct Play {
    pub step: StepId,
    pub role: RoleId,
    pub variable: VariableId,
    /// Whether this play establishes the step's input.
    pub is_input: bool,
}
