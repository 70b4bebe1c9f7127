//! Arithmetic semantics
//!
//! All operations use wrapping 64-bit signed arithmetic; overflow never
//! raises an error.

use super::instruction::ArithmeticOp;

impl ArithmeticOp {
    /// Full operation path.
    pub fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            ArithmeticOp::Add => left.wrapping_add(right),
            ArithmeticOp::Subtract => left.wrapping_sub(right),
            ArithmeticOp::Multiply => left.wrapping_mul(right),
        }
    }

    /// Result of an arithmetic identity, if one applies to these operands.
    ///
    /// `x * 0`, `x * 1`, `x + 0` and `x - 0` (in either operand order where
    /// the identity is commutative) are answered without the full operation.
    pub fn short_circuit(self, left: i64, right: i64) -> Option<i64> {
        match self {
            ArithmeticOp::Multiply if left == 0 || right == 0 => Some(0),
            ArithmeticOp::Multiply if left == 1 => Some(right),
            ArithmeticOp::Multiply if right == 1 => Some(left),
            ArithmeticOp::Add if left == 0 => Some(right),
            ArithmeticOp::Add if right == 0 => Some(left),
            ArithmeticOp::Subtract if right == 0 => Some(left),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_overflow() {
        assert_eq!(ArithmeticOp::Add.apply(i64::MAX, 1), i64::MIN);
        assert_eq!(ArithmeticOp::Subtract.apply(i64::MIN, 1), i64::MAX);
        assert_eq!(ArithmeticOp::Multiply.apply(i64::MAX, 2), -2);
    }

    #[test]
    fn test_identities() {
        assert_eq!(ArithmeticOp::Multiply.short_circuit(0, 17), Some(0));
        assert_eq!(ArithmeticOp::Multiply.short_circuit(17, 0), Some(0));
        assert_eq!(ArithmeticOp::Multiply.short_circuit(1, -5), Some(-5));
        assert_eq!(ArithmeticOp::Multiply.short_circuit(-5, 1), Some(-5));
        assert_eq!(ArithmeticOp::Add.short_circuit(0, 9), Some(9));
        assert_eq!(ArithmeticOp::Add.short_circuit(9, 0), Some(9));
        assert_eq!(ArithmeticOp::Subtract.short_circuit(9, 0), Some(9));
    }

    #[test]
    fn test_no_identity() {
        // 0 - x is not an identity
        assert_eq!(ArithmeticOp::Subtract.short_circuit(0, 9), None);
        assert_eq!(ArithmeticOp::Add.short_circuit(2, 3), None);
        assert_eq!(ArithmeticOp::Multiply.short_circuit(2, 3), None);
    }

    #[test]
    fn test_identities_agree_with_full_path() {
        for op in ArithmeticOp::ALL {
            for (l, r) in [(0, 5), (5, 0), (1, 7), (7, 1), (-3, 0), (0, -3)] {
                if let Some(fast) = op.short_circuit(l, r) {
                    assert_eq!(fast, op.apply(l, r), "{} {} {}", l, op, r);
                }
            }
        }
    }
}
