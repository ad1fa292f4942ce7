//! Inversion and simplification of condition trees.

use jdec_ir::Condition;

/// Logical negation, pushed down to the leaves.
///
/// `inverse(&inverse(c)) == c` for every condition built without
/// `Condition::Inverse` wrappers.
pub fn inverse(condition: &Condition) -> Condition {
    match condition {
        Condition::Boolean { value, inverse } => Condition::boolean(value.clone(), !inverse),
        Condition::Compare { left, right, op } => {
            Condition::compare(left.clone(), right.clone(), op.inverse())
        }
        Condition::And(operands) => Condition::Or(operands.iter().map(inverse).collect()),
        Condition::Or(operands) => Condition::And(operands.iter().map(inverse).collect()),
        Condition::Inverse(inner) => (**inner).clone(),
    }
}

/// Rewrite `condition` into a smaller equivalent form. Applying it twice
/// gives the same result as applying it once.
pub fn simplify_condition(condition: &Condition) -> Condition {
    let mut current = simplify_once(condition);
    loop {
        let next = simplify_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn simplify_once(condition: &Condition) -> Condition {
    match condition {
        Condition::Boolean { .. } | Condition::Compare { .. } => condition.clone(),
        Condition::Inverse(inner) => simplify_once(&inverse(inner)),
        Condition::And(operands) => simplify_junction(operands, true),
        Condition::Or(operands) => simplify_junction(operands, false),
    }
}

fn junction(is_and: bool, operands: Vec<Condition>) -> Condition {
    if is_and {
        Condition::And(operands)
    } else {
        Condition::Or(operands)
    }
}

/// Operands of `condition` if it is a junction of the requested kind.
fn junction_operands(condition: &Condition, is_and: bool) -> Option<&[Condition]> {
    match (condition, is_and) {
        (Condition::And(operands), true) | (Condition::Or(operands), false) => Some(operands),
        _ => None,
    }
}

fn simplify_junction(operands: &[Condition], is_and: bool) -> Condition {
    // Simplify children and flatten nested junctions of the same kind.
    let mut flat: Vec<Condition> = Vec::with_capacity(operands.len());
    for operand in operands {
        let simplified = simplify_once(operand);
        match junction_operands(&simplified, is_and) {
            Some(nested) => flat.extend(nested.iter().cloned()),
            None => flat.push(simplified),
        }
    }

    // Drop duplicates, keeping the first occurrence.
    let mut unique: Vec<Condition> = Vec::with_capacity(flat.len());
    for operand in flat {
        if !unique.contains(&operand) {
            unique.push(operand);
        }
    }

    // Siblings are the operands that are not junctions of the dual kind.
    let siblings: Vec<Condition> = unique
        .iter()
        .filter(|c| junction_operands(c, !is_and).is_none())
        .cloned()
        .collect();

    let mut result: Vec<Condition> = Vec::with_capacity(unique.len());
    for operand in unique {
        let Some(terms) = junction_operands(&operand, !is_and) else {
            result.push(operand);
            continue;
        };
        // Absorption: x || (x && y) => x
        if terms.iter().any(|t| siblings.contains(t)) {
            continue;
        }
        // Complement: x || (!x && y) => x || y
        let kept: Vec<Condition> = terms
            .iter()
            .filter(|t| !siblings.contains(&inverse(t)))
            .cloned()
            .collect();
        if kept.len() == terms.len() || kept.is_empty() {
            // Nothing cancelled, or everything did (a tautology we keep as is).
            result.push(operand);
        } else if kept.len() == 1 {
            result.extend(kept);
        } else {
            result.push(junction(!is_and, kept));
        }
    }

    if result.len() == 1 {
        result.remove(0)
    } else {
        junction(is_and, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdec_ir::{CompareOperator, Instruction, LocalInstance, TypeSignature};

    fn var(name: &str) -> Condition {
        let local = LocalInstance::new(0, name, TypeSignature::Boolean);
        Condition::boolean(Instruction::local(local), false)
    }

    #[test]
    fn test_inverse_compare() {
        let c = Condition::compare(
            Instruction::IntConstant(1),
            Instruction::IntConstant(2),
            CompareOperator::Lt,
        );
        let Condition::Compare { op, .. } = inverse(&c) else {
            panic!("expected compare");
        };
        assert_eq!(op, CompareOperator::Ge);
    }

    #[test]
    fn test_flatten_and_dedupe() {
        let a = var("a");
        let b = var("b");
        let c = Condition::Or(vec![a.clone(), Condition::Or(vec![b.clone(), a.clone()])]);
        assert_eq!(simplify_condition(&c), Condition::Or(vec![a, b]));
    }

    #[test]
    fn test_single_operand_folds() {
        let a = var("a");
        assert_eq!(simplify_condition(&Condition::And(vec![a.clone()])), a);
    }

    #[test]
    fn test_absorption() {
        let x = var("x");
        let y = var("y");
        let c = Condition::Or(vec![x.clone(), Condition::And(vec![x.clone(), y.clone()])]);
        assert_eq!(simplify_condition(&c), x);
        let c = Condition::And(vec![x.clone(), Condition::Or(vec![y, x.clone()])]);
        assert_eq!(simplify_condition(&c), x);
    }

    #[test]
    fn test_complement_in_conjunction() {
        let x = var("x");
        let y = var("y");
        let c = Condition::And(vec![x.clone(), Condition::Or(vec![inverse(&x), y.clone()])]);
        assert_eq!(simplify_condition(&c), Condition::And(vec![x, y]));
    }

    #[test]
    fn test_complement_in_disjunction() {
        let x = var("x");
        let y = var("y");
        let z = var("z");
        let c = Condition::Or(vec![
            x.clone(),
            Condition::And(vec![inverse(&x), y.clone(), z.clone()]),
        ]);
        assert_eq!(
            simplify_condition(&c),
            Condition::Or(vec![x, Condition::And(vec![y, z])])
        );
    }

    #[test]
    fn test_full_cancellation_is_kept() {
        let x = var("x");
        let y = var("y");
        let c = Condition::Or(vec![
            x.clone(),
            y.clone(),
            Condition::And(vec![inverse(&x), inverse(&y)]),
        ]);
        assert_eq!(simplify_condition(&c), c);
    }

    #[test]
    fn test_inverse_wrapper_is_idempotent() {
        let x = var("x");
        let y = var("y");
        let z = var("z");
        let c = Condition::Inverse(Box::new(Condition::And(vec![
            x.clone(),
            Condition::Or(vec![y.clone(), Condition::Inverse(Box::new(z.clone()))]),
        ])));
        let once = simplify_condition(&c);
        assert_eq!(simplify_condition(&once), once);
        assert_eq!(
            once,
            Condition::Or(vec![inverse(&x), Condition::And(vec![inverse(&y), z])])
        );
    }
}
