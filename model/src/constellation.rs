//! The Constellation - the model repository.

use crate::{
    Coefficient, ConceptAnnotation, ConceptRef, Constraint, ContextNote, Derivation,
    EntityTypeFacets, ExpressionKind, ExpressionNode, FactType, ModelError, ModelResult,
    ObjectType, ObjectTypeKind, ParameterRestriction, Play, Query, Reading, Role, RoleRef,
    RoleSequence, Step, Unit, ValueTypeFacets, ValueTypeParameter, Variable,
};
use factum_core::{
    ConstraintId, ExpressionId, FactTypeId, ObjectTypeId, ParameterId, PlayId, QueryId, ReadingId,
    RoleId, RoleSequenceId, StepId, UnitId, Value, ValueRange, VariableId,
};
use log::trace;
use std::collections::HashMap;

/// The repository of compiled schema objects for one vocabulary.
///
/// All creation operations return stable ids; all lookups that find nothing
/// return None. Mutation is append-only except the set-once value type
/// facets, whose setters report a redefinition error on conflicting reuse.
#[derive(Debug, Default)]
pub struct Constellation {
    vocabulary: String,

    object_types: Vec<ObjectType>,
    object_type_names: HashMap<String, ObjectTypeId>,

    fact_types: Vec<FactType>,
    roles: Vec<Role>,
    readings: Vec<Reading>,
    readings_by_signature: HashMap<String, ReadingId>,
    role_sequences: Vec<RoleSequence>,

    constraints: Vec<Constraint>,

    queries: Vec<Query>,
    variables: Vec<Variable>,
    steps: Vec<Step>,
    plays: Vec<Play>,

    units: Vec<Unit>,

    parameters: Vec<ValueTypeParameter>,
    restrictions: Vec<ParameterRestriction>,

    expressions: Vec<ExpressionNode>,

    annotations: Vec<ConceptAnnotation>,
    context_notes: Vec<(ConceptRef, ContextNote)>,
}

impl Constellation {
    /// Create an empty constellation for the named vocabulary.
    pub fn new(vocabulary: impl Into<String>) -> Self {
        Self {
            vocabulary: vocabulary.into(),
            ..Default::default()
        }
    }

    /// The vocabulary name.
    pub fn vocabulary(&self) -> &str {
        &self.vocabulary
    }

    /// Name (or rename) the vocabulary, for schema headers.
    pub fn set_vocabulary(&mut self, name: impl Into<String>) {
        self.vocabulary = name.into();
    }

    // ==================== Object Types ====================

    /// Look up an object type by name.
    pub fn object_type(&self, name: &str) -> Option<ObjectTypeId> {
        self.object_type_names.get(name).copied()
    }

    /// Get an object type definition.
    pub fn object_type_def(&self, id: ObjectTypeId) -> &ObjectType {
        &self.object_types[id.index()]
    }

    /// Look up a value type by name; None if absent or an entity type.
    pub fn value_type(&self, name: &str) -> Option<ObjectTypeId> {
        self.object_type(name)
            .filter(|id| self.object_type_def(*id).is_value_type())
    }

    /// Look up or create a value type by name.
    pub fn ensure_value_type(&mut self, name: &str) -> ModelResult<ObjectTypeId> {
        if let Some(id) = self.object_type(name) {
            let existing = self.object_type_def(id);
            if existing.is_value_type() {
                return Ok(id);
            }
            return Err(ModelError::name_clash(
                name,
                existing.kind_name(),
                "a value type",
            ));
        }
        Ok(self.insert_object_type(name, ObjectTypeKind::ValueType(ValueTypeFacets::default())))
    }

    /// Look up or create an entity type by name.
    pub fn ensure_entity_type(&mut self, name: &str) -> ModelResult<ObjectTypeId> {
        if let Some(id) = self.object_type(name) {
            let existing = self.object_type_def(id);
            if existing.is_entity_type() {
                return Ok(id);
            }
            return Err(ModelError::name_clash(
                name,
                existing.kind_name(),
                "an entity type",
            ));
        }
        Ok(self.insert_object_type(
            name,
            ObjectTypeKind::EntityType(EntityTypeFacets::default()),
        ))
    }

    fn insert_object_type(&mut self, name: &str, kind: ObjectTypeKind) -> ObjectTypeId {
        let id = ObjectTypeId::new(self.object_types.len() as u32);
        trace!("creating object type '{}' as {}", name, id);
        self.object_types.push(ObjectType {
            id,
            name: name.to_string(),
            kind,
            supertypes: Vec::new(),
            is_independent: false,
        });
        self.object_type_names.insert(name.to_string(), id);
        id
    }

    /// Add a direct supertype to an object type, ignoring duplicates.
    pub fn add_supertype(&mut self, id: ObjectTypeId, supertype: ObjectTypeId) {
        let ot = &mut self.object_types[id.index()];
        if !ot.supertypes.contains(&supertype) {
            ot.supertypes.push(supertype);
        }
    }

    /// Set a value type's supertype; a second differing attempt is fatal.
    pub fn set_value_type_supertype(
        &mut self,
        id: ObjectTypeId,
        supertype: ObjectTypeId,
    ) -> ModelResult<()> {
        let existing = self.object_types[id.index()].supertypes.first().copied();
        match existing {
            Some(old) if old != supertype => Err(ModelError::redefinition(
                "supertype",
                self.object_type_def(id).name.clone(),
                &self.object_type_def(old).name,
                &self.object_type_def(supertype).name,
            )),
            Some(_) => Ok(()),
            None => {
                self.object_types[id.index()].supertypes.push(supertype);
                Ok(())
            }
        }
    }

    /// All supertypes of an object type, including itself, nearest first.
    pub fn supertypes_transitive(&self, id: ObjectTypeId) -> Vec<ObjectTypeId> {
        let mut result = Vec::new();
        self.collect_supertypes(id, &mut result);
        result
    }

    fn collect_supertypes(&self, id: ObjectTypeId, result: &mut Vec<ObjectTypeId>) {
        if result.contains(&id) {
            return;
        }
        result.push(id);
        for &st in &self.object_types[id.index()].supertypes {
            self.collect_supertypes(st, result);
        }
    }

    /// The first common supertype of two object types, if any.
    pub fn common_supertype(&self, a: ObjectTypeId, b: ObjectTypeId) -> Option<ObjectTypeId> {
        let bs = self.supertypes_transitive(b);
        self.supertypes_transitive(a)
            .into_iter()
            .find(|st| bs.contains(st))
    }

    /// Set a value type's length; a second differing attempt is fatal.
    pub fn set_value_type_length(&mut self, id: ObjectTypeId, length: u32) -> ModelResult<()> {
        let name = self.object_type_def(id).name.clone();
        let facets = self.value_facets_mut(id)?;
        match facets.length {
            Some(old) if old != length => {
                Err(ModelError::redefinition("length", name, old, length))
            }
            _ => {
                facets.length = Some(length);
                Ok(())
            }
        }
    }

    /// Set a value type's scale; a second differing attempt is fatal.
    pub fn set_value_type_scale(&mut self, id: ObjectTypeId, scale: u32) -> ModelResult<()> {
        let name = self.object_type_def(id).name.clone();
        let facets = self.value_facets_mut(id)?;
        match facets.scale {
            Some(old) if old != scale => Err(ModelError::redefinition("scale", name, old, scale)),
            _ => {
                facets.scale = Some(scale);
                Ok(())
            }
        }
    }

    /// Set a value type's unit; a second differing attempt is fatal.
    pub fn set_value_type_unit(&mut self, id: ObjectTypeId, unit: UnitId) -> ModelResult<()> {
        let name = self.object_type_def(id).name.clone();
        let facets = self.value_facets_mut(id)?;
        match facets.unit {
            Some(old) if old != unit => Err(ModelError::redefinition("unit", name, old, unit)),
            _ => {
                facets.unit = Some(unit);
                Ok(())
            }
        }
    }

    /// Attach a value constraint to a value type; reattachment is fatal.
    pub fn set_value_type_constraint(
        &mut self,
        id: ObjectTypeId,
        constraint: ConstraintId,
    ) -> ModelResult<()> {
        let name = self.object_type_def(id).name.clone();
        let facets = self.value_facets_mut(id)?;
        match facets.value_constraint {
            Some(old) if old != constraint => Err(ModelError::redefinition(
                "value constraint",
                name,
                old,
                constraint,
            )),
            _ => {
                facets.value_constraint = Some(constraint);
                Ok(())
            }
        }
    }

    /// Set the transaction phase of an auto-assigned value type.
    pub fn set_value_type_auto_assigned_at(
        &mut self,
        id: ObjectTypeId,
        phase: impl Into<String>,
    ) -> ModelResult<()> {
        self.value_facets_mut(id)?.auto_assigned_at = Some(phase.into());
        Ok(())
    }

    fn value_facets_mut(&mut self, id: ObjectTypeId) -> ModelResult<&mut ValueTypeFacets> {
        let name = self.object_types[id.index()].name.clone();
        let kind_name = self.object_types[id.index()].kind_name();
        self.object_types[id.index()]
            .value_facets_mut()
            .ok_or_else(|| ModelError::name_clash(name, kind_name, "a value type"))
    }

    /// Mark an object type independent.
    pub fn set_independent(&mut self, id: ObjectTypeId) {
        self.object_types[id.index()].is_independent = true;
    }

    /// Record that an entity type objectifies a fact type.
    pub fn set_objectifies(&mut self, id: ObjectTypeId, fact_type: FactTypeId) {
        if let ObjectTypeKind::EntityType(facets) = &mut self.object_types[id.index()].kind {
            facets.objectifies = Some(fact_type);
        }
        self.fact_types[fact_type.index()].objectified_as = Some(id);
    }

    // ==================== Fact Types ====================

    /// Create a new fact type with no roles yet.
    pub fn add_fact_type(&mut self) -> FactTypeId {
        let id = FactTypeId::new(self.fact_types.len() as u32);
        self.fact_types.push(FactType::default());
        id
    }

    /// Get a fact type definition.
    pub fn fact_type(&self, id: FactTypeId) -> &FactType {
        &self.fact_types[id.index()]
    }

    pub fn fact_type_mut(&mut self, id: FactTypeId) -> &mut FactType {
        &mut self.fact_types[id.index()]
    }

    /// Add a role to a fact type.
    pub fn add_role(
        &mut self,
        fact_type: FactTypeId,
        object_type: ObjectTypeId,
        role_name: Option<String>,
    ) -> RoleId {
        let id = RoleId::new(self.roles.len() as u32);
        self.roles.push(Role {
            fact_type,
            object_type,
            role_name,
        });
        self.fact_types[fact_type.index()].roles.push(id);
        id
    }

    /// Get a role definition.
    pub fn role(&self, id: RoleId) -> &Role {
        &self.roles[id.index()]
    }

    /// Create a role sequence from role refs.
    pub fn add_role_sequence(&mut self, role_refs: Vec<RoleRef>) -> RoleSequenceId {
        let id = RoleSequenceId::new(self.role_sequences.len() as u32);
        self.role_sequences.push(RoleSequence { role_refs });
        id
    }

    /// Get a role sequence.
    pub fn role_sequence(&self, id: RoleSequenceId) -> &RoleSequence {
        &self.role_sequences[id.index()]
    }

    pub fn role_sequence_mut(&mut self, id: RoleSequenceId) -> &mut RoleSequence {
        &mut self.role_sequences[id.index()]
    }

    /// Register a reading of a fact type under its structural signature.
    pub fn add_reading(
        &mut self,
        fact_type: FactTypeId,
        role_sequence: RoleSequenceId,
        text: impl Into<String>,
        signature: impl Into<String>,
    ) -> ReadingId {
        let id = ReadingId::new(self.readings.len() as u32);
        let ordinal = self.fact_types[fact_type.index()].readings.len() as u16;
        let text = text.into();
        trace!("adding reading {} '{}'", id, text);
        self.readings.push(Reading {
            fact_type,
            ordinal,
            role_sequence,
            text,
        });
        self.fact_types[fact_type.index()].readings.push(id);
        self.readings_by_signature.insert(signature.into(), id);
        id
    }

    /// Find a reading by structural signature.
    pub fn find_reading(&self, signature: &str) -> Option<ReadingId> {
        self.readings_by_signature.get(signature).copied()
    }

    /// Get a reading.
    pub fn reading(&self, id: ReadingId) -> &Reading {
        &self.readings[id.index()]
    }

    /// Expand a reading's positional text with its player names, for
    /// diagnostics.
    pub fn reading_text(&self, id: ReadingId) -> String {
        let reading = self.reading(id);
        let rs = self.role_sequence(reading.role_sequence);
        let mut text = reading.text.clone();
        for (i, rr) in rs.role_refs.iter().enumerate() {
            let player = &self.object_type_def(self.role(rr.role).object_type).name;
            text = text.replace(&format!("{{{}}}", i), player);
        }
        text
    }

    /// The first reading of a fact type, expanded, for diagnostics.
    pub fn fact_type_text(&self, id: FactTypeId) -> String {
        match self.fact_type(id).readings.first() {
            Some(reading) => self.reading_text(*reading),
            None => format!("fact type {}", id),
        }
    }

    // ==================== Constraints ====================

    /// Add a compiled constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId::new(self.constraints.len() as u32);
        trace!("adding {} as {}", constraint.kind_name(), id);
        self.constraints.push(constraint);
        id
    }

    /// Get a constraint.
    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.index()]
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> &mut Constraint {
        &mut self.constraints[id.index()]
    }

    /// Iterate all constraints.
    pub fn all_constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(i, c)| (ConstraintId::new(i as u32), c))
    }

    // ==================== Queries ====================

    /// Create a new query.
    pub fn add_query(&mut self) -> QueryId {
        let id = QueryId::new(self.queries.len() as u32);
        self.queries.push(Query::default());
        id
    }

    /// Get a query.
    pub fn query(&self, id: QueryId) -> &Query {
        &self.queries[id.index()]
    }

    /// Add a variable to a query.
    pub fn add_variable(
        &mut self,
        query: QueryId,
        object_type: ObjectTypeId,
        role_name: Option<String>,
    ) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        let ordinal = self.queries[query.index()].variables.len() as u16;
        self.variables.push(Variable {
            query,
            ordinal,
            object_type,
            role_name,
            value: None,
            unit: None,
        });
        self.queries[query.index()].variables.push(id);
        id
    }

    /// Get a variable.
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Fix a variable to a literal value.
    pub fn set_variable_value(&mut self, id: VariableId, value: Value, unit: Option<UnitId>) {
        let var = &mut self.variables[id.index()];
        var.value = Some(value);
        var.unit = unit;
    }

    /// Add a step to a query.
    pub fn add_step(
        &mut self,
        query: QueryId,
        fact_type: FactTypeId,
        is_disallowed: bool,
        is_optional: bool,
    ) -> StepId {
        let id = StepId::new(self.steps.len() as u32);
        let ordinal = self.queries[query.index()].steps.len() as u16;
        self.steps.push(Step {
            query,
            ordinal,
            fact_type,
            is_disallowed,
            is_optional,
            objectification_variable: None,
            plays: Vec::new(),
        });
        self.queries[query.index()].steps.push(id);
        id
    }

    /// Get a step.
    pub fn step(&self, id: StepId) -> &Step {
        &self.steps[id.index()]
    }

    /// Mark a step as the objectification source of a variable.
    pub fn set_objectification_variable(&mut self, step: StepId, variable: VariableId) {
        self.steps[step.index()].objectification_variable = Some(variable);
    }

    /// Add a play to a step.
    pub fn add_play(
        &mut self,
        step: StepId,
        role: RoleId,
        variable: VariableId,
        is_input: bool,
    ) -> PlayId {
        let id = PlayId::new(self.plays.len() as u32);
        self.plays.push(Play {
            step,
            role,
            variable,
            is_input,
        });
        self.steps[step.index()].plays.push(id);
        id
    }

    /// Get a play.
    pub fn play(&self, id: PlayId) -> &Play {
        &self.plays[id.index()]
    }

    /// Check a query's internal consistency: every play's variable must
    /// belong to the query, exactly once.
    pub fn validate_query(&self, id: QueryId) -> ModelResult<()> {
        let query = self.query(id);
        for (i, &v) in query.variables.iter().enumerate() {
            if query.variables[i + 1..].contains(&v) {
                return Err(ModelError::InvalidQuery {
                    reason: format!("variable {} appears twice", v),
                });
            }
            if self.variable(v).query != id {
                return Err(ModelError::InvalidQuery {
                    reason: format!("variable {} belongs to another query", v),
                });
            }
        }
        for &s in &query.steps {
            for &p in &self.step(s).plays {
                let play = self.play(p);
                if !query.variables.contains(&play.variable) {
                    return Err(ModelError::InvalidQuery {
                        reason: format!("play {} references foreign variable {}", p, play.variable),
                    });
                }
            }
        }
        Ok(())
    }

    // ==================== Units ====================

    /// Look up a unit by singular or plural name.
    pub fn unit_by_name(&self, name: &str) -> Option<UnitId> {
        self.units
            .iter()
            .position(|u| u.is_named(name))
            .map(|i| UnitId::new(i as u32))
    }

    /// Get a unit.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    /// Add a unit; duplicate singular or plural names are fatal.
    pub fn add_unit(
        &mut self,
        name: impl Into<String>,
        plural_name: Option<String>,
        coefficient: Option<Coefficient>,
        offset: Option<f64>,
        is_fundamental: bool,
        ephemera_url: Option<String>,
    ) -> ModelResult<UnitId> {
        let name = name.into();
        if self.unit_by_name(&name).is_some() {
            return Err(ModelError::DuplicateUnit { name });
        }
        if let Some(plural) = &plural_name {
            if self.unit_by_name(plural).is_some() {
                return Err(ModelError::DuplicateUnit {
                    name: plural.clone(),
                });
            }
        }
        let id = UnitId::new(self.units.len() as u32);
        trace!("defining unit '{}' as {}", name, id);
        self.units.push(Unit {
            id,
            name,
            plural_name,
            coefficient,
            offset,
            is_fundamental,
            ephemera_url,
            derivations: Vec::new(),
        });
        Ok(id)
    }

    /// Record a base-unit derivation on a derived unit.
    pub fn add_derivation(&mut self, derived: UnitId, base_unit: UnitId, exponent: i32) {
        self.units[derived.index()].derivations.push(Derivation {
            base_unit,
            exponent,
        });
    }

    // ==================== Value Type Parameters ====================

    /// Add a parameter definition on a value type.
    pub fn add_parameter(
        &mut self,
        value_type: ObjectTypeId,
        name: impl Into<String>,
        parameter_value_type: ObjectTypeId,
    ) -> ParameterId {
        let id = ParameterId::new(self.parameters.len() as u32);
        self.parameters.push(ValueTypeParameter {
            id,
            value_type,
            name: name.into(),
            parameter_value_type,
            restriction_style: None,
        });
        id
    }

    /// Get a parameter.
    pub fn parameter(&self, id: ParameterId) -> &ValueTypeParameter {
        &self.parameters[id.index()]
    }

    /// Record the restriction style of a comparison-form restriction.
    pub fn set_restriction_style(&mut self, id: ParameterId, style: impl Into<String>) {
        self.parameters[id.index()].restriction_style = Some(style.into());
    }

    /// The parameter of the given name defined exactly on `value_type`.
    pub fn parameter_of_exact(&self, value_type: ObjectTypeId, name: &str) -> Option<ParameterId> {
        self.parameters
            .iter()
            .find(|p| p.value_type == value_type && p.name == name)
            .map(|p| p.id)
    }

    /// Add a restriction row for a parameter at a value type.
    pub fn add_parameter_restriction(
        &mut self,
        value_type: ObjectTypeId,
        parameter: ParameterId,
        range: ValueRange,
    ) {
        self.restrictions.push(ParameterRestriction {
            value_type,
            parameter,
            range,
        });
    }

    /// The restriction rows for a parameter declared exactly at `value_type`.
    pub fn restrictions_at(
        &self,
        value_type: ObjectTypeId,
        parameter: ParameterId,
    ) -> Vec<&ParameterRestriction> {
        self.restrictions
            .iter()
            .filter(|r| r.value_type == value_type && r.parameter == parameter)
            .collect()
    }

    // ==================== Expressions ====================

    /// Add an expression graph node.
    pub fn add_expression(&mut self, kind: ExpressionKind) -> ExpressionId {
        let id = ExpressionId::new(self.expressions.len() as u32);
        self.expressions.push(ExpressionNode { kind });
        id
    }

    /// Get an expression graph node.
    pub fn expression(&self, id: ExpressionId) -> &ExpressionNode {
        &self.expressions[id.index()]
    }

    // ==================== Annotations and Context Notes ====================

    /// Attach a free-form annotation to a concept.
    pub fn annotate(&mut self, concept: ConceptRef, text: impl Into<String>) {
        self.annotations.push(ConceptAnnotation {
            concept,
            text: text.into(),
        });
    }

    /// The annotations attached to a concept.
    pub fn annotations_of(&self, concept: ConceptRef) -> Vec<&str> {
        self.annotations
            .iter()
            .filter(|a| a.concept == concept)
            .map(|a| a.text.as_str())
            .collect()
    }

    /// Attach a context note to a concept.
    pub fn add_context_note(&mut self, concept: ConceptRef, note: ContextNote) {
        self.context_notes.push((concept, note));
    }

    /// The context notes attached to a concept.
    pub fn context_notes_of(&self, concept: ConceptRef) -> Vec<&ContextNote> {
        self.context_notes
            .iter()
            .filter(|(c, _)| *c == concept)
            .map(|(_, n)| n)
            .collect()
    }
}
