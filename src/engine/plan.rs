//! Validation, required-variable discovery and cycle detection
//!
//! [`classify`] splits the instruction list into definitions and print
//! requests. [`ExecutionPlan::build`] then walks the dependency graph from the
//! print targets only, so calculations nobody prints are never looked at past
//! the duplicate check: they may reference undefined variables or form cycles
//! without failing the call.

use super::errors::ExecError;
use super::instruction::{CalcInstruction, Instruction, PrintInstruction};
use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxHashMap;

/// An instruction list split into definitions and print requests.
#[derive(Debug)]
pub struct ClassifiedProgram<'a> {
    /// Definitions in input order
    pub definitions: Vec<&'a CalcInstruction>,
    /// Print requests in input order
    pub prints: Vec<&'a PrintInstruction>,
    by_name: FxHashMap<&'a str, &'a CalcInstruction>,
}

impl<'a> ClassifiedProgram<'a> {
    pub fn definition(&self, var: &str) -> Option<&'a CalcInstruction> {
        self.by_name.get(var).copied()
    }

    pub fn has_prints(&self) -> bool {
        !self.prints.is_empty()
    }
}

fn check_name(name: &str, index: usize) -> Result<(), ExecError> {
    if name.trim().is_empty() {
        Err(ExecError::BlankName { index })
    } else {
        Ok(())
    }
}

/// Partition `instructions` into a name → `Calc` mapping and the ordered
/// print requests, rejecting blank names and duplicate definitions.
pub fn classify(instructions: &[Instruction]) -> Result<ClassifiedProgram<'_>, ExecError> {
    let mut definitions = Vec::new();
    let mut prints = Vec::new();
    let mut by_name = FxHashMap::default();

    for (index, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::Calc(calc) => {
                check_name(&calc.var, index)?;
                for dep in calc.dependencies() {
                    check_name(dep, index)?;
                }
                if by_name.insert(calc.var.as_str(), calc).is_some() {
                    return Err(ExecError::DuplicateDefinition(calc.var.clone()));
                }
                definitions.push(calc);
            }
            Instruction::Print(print) => {
                check_name(&print.var, index)?;
                prints.push(print);
            }
        }
    }

    Ok(ClassifiedProgram {
        definitions,
        prints,
        by_name,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// The calculations reachable from the print requests.
///
/// Built fresh for every execution and dropped with it.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Required calculations; every entry comes after all of its dependencies
    required: IndexMap<String, CalcInstruction>,
    unused: Vec<String>,
}

impl ExecutionPlan {
    /// Depth-first walk from each print target in input order.
    ///
    /// Variables are coloured in-progress on entry and done once all their
    /// dependencies are done, so a done variable is never walked twice and an
    /// edge back into an in-progress variable is reported as a cycle between
    /// the two endpoints. The walk keeps its own stack, so long dependency
    /// chains cannot overflow the thread stack.
    pub fn build(program: &ClassifiedProgram<'_>) -> Result<Self, ExecError> {
        let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
        let mut required = IndexMap::new();

        let lookup = |var: &str| {
            program
                .definition(var)
                .ok_or_else(|| ExecError::UndefinedVariable(var.to_string()))
        };

        for print in &program.prints {
            if marks.contains_key(print.var.as_str()) {
                continue;
            }

            let mut stack: Vec<(&CalcInstruction, usize)> = vec![(lookup(&print.var)?, 0)];
            marks.insert(print.var.as_str(), Mark::InProgress);

            while let Some(frame) = stack.last_mut() {
                let calc = frame.0;
                let next = calc.dependencies().nth(frame.1);
                frame.1 += 1;

                match next {
                    Some(dep) => match marks.get(dep) {
                        Some(Mark::InProgress) => {
                            return Err(ExecError::CyclicDependency(
                                calc.var.clone(),
                                dep.to_string(),
                            ));
                        }
                        Some(Mark::Done) => {}
                        None => {
                            let dep_calc = lookup(dep)?;
                            marks.insert(dep, Mark::InProgress);
                            stack.push((dep_calc, 0));
                        }
                    },
                    None => {
                        marks.insert(calc.var.as_str(), Mark::Done);
                        required.insert(calc.var.clone(), calc.clone());
                        stack.pop();
                    }
                }
            }
        }

        let unused: Vec<String> = program
            .definitions
            .iter()
            .filter(|calc| !required.contains_key(calc.var.as_str()))
            .map(|calc| calc.var.clone())
            .collect();

        debug!(
            "execution plan: {} required, {} unused, order [{}]",
            required.len(),
            unused.len(),
            required
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ExecutionPlan { required, unused })
    }

    pub fn is_required(&self, var: &str) -> bool {
        self.required.contains_key(var)
    }

    /// The calculation for a required variable.
    pub fn calculation(&self, var: &str) -> Result<&CalcInstruction, ExecError> {
        self.required
            .get(var)
            .ok_or_else(|| ExecError::NotRequired(var.to_string()))
    }

    /// Required variables, dependencies before dependents.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &str> {
        self.required.keys().map(String::as_str)
    }

    /// Defined variables no print depends on, in input order.
    pub fn unused(&self) -> &[String] {
        &self.unused
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instruction::{ArithmeticOp::*, Operand, Operand::Literal};

    fn plan(instructions: &[Instruction]) -> Result<ExecutionPlan, ExecError> {
        ExecutionPlan::build(&classify(instructions)?)
    }

    #[test]
    fn test_classify_keeps_print_order() {
        let program = vec![
            Instruction::print("b"),
            Instruction::calc("a", Add, Literal(1), Literal(2)),
            Instruction::print("a"),
            Instruction::print("b"),
        ];
        let classified = classify(&program).unwrap();
        let prints: Vec<&str> = classified.prints.iter().map(|p| p.var.as_str()).collect();
        assert_eq!(prints, vec!["b", "a", "b"]);
        assert_eq!(classified.definitions.len(), 1);
    }

    #[test]
    fn test_duplicate_definition() {
        let program = vec![
            Instruction::calc("x", Add, Literal(1), Literal(1)),
            Instruction::calc("x", Subtract, Literal(2), Literal(1)),
        ];
        assert_eq!(
            classify(&program).unwrap_err(),
            ExecError::DuplicateDefinition("x".to_string())
        );
    }

    #[test]
    fn test_blank_names() {
        let program = vec![
            Instruction::calc("x", Add, Literal(1), Literal(1)),
            Instruction::print("  "),
        ];
        assert_eq!(
            classify(&program).unwrap_err(),
            ExecError::BlankName { index: 1 }
        );

        let program = vec![Instruction::calc("x", Add, Operand::var(""), Literal(1))];
        assert_eq!(
            classify(&program).unwrap_err(),
            ExecError::BlankName { index: 0 }
        );
    }

    #[test]
    fn test_dependencies_come_first() {
        let program = vec![
            Instruction::calc("z", Multiply, Operand::var("x"), Operand::var("y")),
            Instruction::calc("y", Subtract, Operand::var("x"), Literal(3)),
            Instruction::calc("x", Add, Literal(10), Literal(2)),
            Instruction::print("z"),
        ];
        let plan = plan(&program).unwrap();
        let order: Vec<&str> = plan.evaluation_order().collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_unused_branches_are_pruned() {
        let program = vec![
            Instruction::calc("x", Add, Literal(10), Literal(2)),
            Instruction::calc("unusedA", Add, Operand::var("x"), Literal(100)),
            Instruction::calc("unusedB", Multiply, Operand::var("unusedA"), Literal(2)),
            Instruction::print("x"),
        ];
        let plan = plan(&program).unwrap();
        assert!(plan.is_required("x"));
        assert!(!plan.is_required("unusedA"));
        assert_eq!(
            plan.unused(),
            &["unusedA".to_string(), "unusedB".to_string()]
        );
        assert_eq!(
            plan.calculation("unusedB").unwrap_err(),
            ExecError::NotRequired("unusedB".to_string())
        );
    }

    #[test]
    fn test_unused_cycle_and_missing_reference_are_ignored() {
        let program = vec![
            Instruction::calc("a", Add, Operand::var("b"), Literal(1)),
            Instruction::calc("b", Add, Operand::var("a"), Literal(1)),
            Instruction::calc("c", Add, Operand::var("nowhere"), Literal(1)),
            Instruction::calc("x", Add, Literal(1), Literal(2)),
            Instruction::print("x"),
        ];
        let plan = plan(&program).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_cycle_names_both_endpoints() {
        let program = vec![
            Instruction::calc("a", Add, Operand::var("b"), Literal(1)),
            Instruction::calc("b", Add, Operand::var("a"), Literal(1)),
            Instruction::print("a"),
        ];
        assert_eq!(
            plan(&program).unwrap_err(),
            ExecError::CyclicDependency("b".to_string(), "a".to_string())
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let program = vec![
            Instruction::calc("a", Add, Operand::var("a"), Literal(1)),
            Instruction::print("a"),
        ];
        assert_eq!(
            plan(&program).unwrap_err(),
            ExecError::CyclicDependency("a".to_string(), "a".to_string())
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let program = vec![
            Instruction::calc("base", Add, Literal(1), Literal(2)),
            Instruction::calc("l", Add, Operand::var("base"), Literal(1)),
            Instruction::calc("r", Add, Operand::var("base"), Literal(2)),
            Instruction::calc("top", Add, Operand::var("l"), Operand::var("r")),
            Instruction::print("top"),
            Instruction::print("base"),
        ];
        let plan = plan(&program).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.evaluation_order().next(), Some("base"));
    }

    #[test]
    fn test_missing_dependency() {
        let program = vec![
            Instruction::calc("x", Add, Operand::var("y"), Literal(1)),
            Instruction::print("x"),
        ];
        assert_eq!(
            plan(&program).unwrap_err(),
            ExecError::UndefinedVariable("y".to_string())
        );
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut program = vec![Instruction::calc("v0", Add, Literal(1), Literal(1))];
        for i in 1..50_000 {
            program.push(Instruction::calc(
                format!("v{}", i),
                Add,
                Operand::var(format!("v{}", i - 1)),
                Literal(1),
            ));
        }
        program.push(Instruction::print("v49999"));
        assert_eq!(plan(&program).unwrap().len(), 50_000);
    }
}
