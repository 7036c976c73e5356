//! Property-based tests for the field capabilities.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::modular::primes;
    use crate::{Field, Modular, Rational, Rationals};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn prime_field() -> impl Strategy<Value = Modular> {
        prop_oneof![Just(101u64), Just(65_521), Just(primes::P998244353), Just(primes::MERSENNE_61)]
            .prop_map(|p| Modular::new(p).unwrap())
    }

    proptest! {
        // Modular field axioms

        #[test]
        fn modular_add_commutative(f in prime_field(), a in small_int(), b in small_int()) {
            let (a, b) = (f.init(a), f.init(b));
            prop_assert_eq!(f.add(&a, &b), f.add(&b, &a));
        }

        #[test]
        fn modular_distributive(
            f in prime_field(),
            a in small_int(),
            b in small_int(),
            c in small_int(),
        ) {
            let (a, b, c) = (f.init(a), f.init(b), f.init(c));
            prop_assert_eq!(
                f.mul(&a, &f.add(&b, &c)),
                f.add(&f.mul(&a, &b), &f.mul(&a, &c))
            );
        }

        #[test]
        fn modular_additive_inverse(f in prime_field(), a in small_int()) {
            let a = f.init(a);
            prop_assert!(f.is_zero(&f.add(&a, &f.neg(&a))));
        }

        #[test]
        fn modular_multiplicative_inverse(f in prime_field(), a in non_zero_int()) {
            let a = f.init(a);
            prop_assume!(!f.is_zero(&a));
            let inv = f.inv(&a).unwrap();
            prop_assert!(f.is_one(&f.mul(&a, &inv)));
        }

        #[test]
        fn modular_init_respects_sub(f in prime_field(), a in small_int(), b in small_int()) {
            prop_assert_eq!(f.init(a - b), f.sub(&f.init(a), &f.init(b)));
        }

        #[test]
        fn modular_maxpyin_matches_pure_ops(
            f in prime_field(),
            r in small_int(),
            a in small_int(),
            x in small_int(),
        ) {
            let (mut acc, a, x) = (f.init(r), f.init(a), f.init(x));
            let expected = f.sub(&acc, &f.mul(&a, &x));
            f.maxpyin(&mut acc, &a, &x);
            prop_assert_eq!(acc, expected);
        }

        // Rational field axioms

        #[test]
        fn rational_add_commutative(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int()
        ) {
            let q = Rationals::new();
            let a = Rational::new(num_a, den_a);
            let b = Rational::new(num_b, den_b);
            prop_assert_eq!(q.add(&a, &b), q.add(&b, &a));
        }

        #[test]
        fn rational_mul_associative(
            num_a in small_int(),
            num_b in small_int(),
            num_c in small_int(),
            den in non_zero_int()
        ) {
            let q = Rationals::new();
            let a = Rational::new(num_a, den);
            let b = Rational::new(num_b, den);
            let c = Rational::new(num_c, den);
            prop_assert_eq!(q.mul(&q.mul(&a, &b), &c), q.mul(&a, &q.mul(&b, &c)));
        }

        #[test]
        fn rational_div_then_mul(
            num_a in small_int(),
            num_b in non_zero_int(),
            den_b in non_zero_int(),
        ) {
            let q = Rationals::new();
            let a = Rational::from_integer(num_a);
            let b = Rational::new(num_b, den_b);
            let quotient = q.div(&a, &b).unwrap();
            prop_assert_eq!(q.mul(&quotient, &b), a);
        }

        #[test]
        fn rational_magnitude_matches_abs(num_a in small_int(), num_b in small_int()) {
            let q = Rationals::new();
            let ord = q.compare_magnitude(&q.init(num_a), &q.init(num_b));
            prop_assert_eq!(ord, Some(num_a.abs().cmp(&num_b.abs())));
        }
    }
}
