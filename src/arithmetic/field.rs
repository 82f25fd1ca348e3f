//! Exact arithmetic over the finite field GF(q).
//!
//! Elements are plain `u32` values in `0..q`. For a prime order the value is
//! the residue itself. For `q = p^k` with `k > 1` the value packs the
//! coefficients of a polynomial of degree `< k` in base `p`
//! (`a = Σ a_i p^i` stands for `Σ a_i x^i`), and multiplication goes through
//! log/exp tables over a primitive element. The constants `0..p` are the
//! prime subfield in both representations.

use rand::Rng;

use crate::potts_error::PottsError;

/// A field element, always in `0..order`.
pub type FieldElement = u32;

/// Largest supported field order (tables stay small).
pub const MAX_FIELD_ORDER: u32 = 1 << 16;

/// Log/exp tables for an extension field.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ExtensionTables {
    /// `exp[i] = g^i` for `i in 0..2(q-1)`, doubled so products skip a reduction.
    exp: Vec<FieldElement>,
    /// `log[a]` for nonzero `a`; `log[0]` is unused.
    log: Vec<u32>,
    /// Low coefficients `c_0..c_{k-1}` of the monic primitive modulus.
    modulus: Vec<u32>,
}

/// The finite field of a given prime-power order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiniteField {
    order: u32,
    characteristic: u32,
    degree: u32,
    tables: Option<ExtensionTables>,
}

fn smallest_prime_factor(n: u32) -> u32 {
    let mut d = 2u32;
    while (d as u64) * (d as u64) <= n as u64 {
        if n % d == 0 {
            return d;
        }
        d += 1;
    }
    n
}

/// Split `q` into `(p, k)` with `q = p^k`, or `None` if `q` is not a prime power.
pub fn prime_power_decomposition(q: u32) -> Option<(u32, u32)> {
    if q < 2 {
        return None;
    }
    let p = smallest_prime_factor(q);
    let mut rest = q;
    let mut k = 0;
    while rest % p == 0 {
        rest /= p;
        k += 1;
    }
    (rest == 1).then_some((p, k))
}

fn digits(mut a: u32, p: u32, k: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(k as usize);
    for _ in 0..k {
        out.push(a % p);
        a /= p;
    }
    out
}

fn undigits(d: &[u32], p: u32) -> u32 {
    d.iter().rev().fold(0, |acc, &c| acc * p + c)
}

/// Multiply the packed polynomial `a` by `x`, reducing by the monic modulus.
fn times_x(a: u32, p: u32, k: u32, modulus: &[u32]) -> u32 {
    let d = digits(a, p, k);
    let top = d[k as usize - 1];
    let mut e = vec![0u32; k as usize];
    for i in 1..k as usize {
        e[i] = d[i - 1];
    }
    if top != 0 {
        // x^k = -(c_0 + c_1 x + ... + c_{k-1} x^{k-1})
        for (i, &c) in modulus.iter().enumerate() {
            e[i] = (e[i] + (p - c % p) % p * top) % p;
        }
    }
    undigits(&e, p)
}

/// Search monic degree-`k` polynomials over GF(p) in increasing packed order
/// for one whose root `x` has multiplicative order `p^k - 1`.
fn primitive_tables(p: u32, k: u32) -> ExtensionTables {
    let q = p.pow(k);
    for packed in 1..q {
        let modulus = digits(packed, p, k);
        if modulus[0] == 0 {
            continue;
        }
        let mut exp = Vec::with_capacity(2 * (q as usize - 1));
        let mut log = vec![0u32; q as usize];
        let mut seen = vec![false; q as usize];
        let mut cur = 1u32;
        let mut primitive = true;
        for i in 0..(q - 1) {
            if seen[cur as usize] {
                primitive = false;
                break;
            }
            seen[cur as usize] = true;
            exp.push(cur);
            log[cur as usize] = i;
            cur = times_x(cur, p, k, &modulus);
        }
        if primitive && cur == 1 {
            let head = exp.clone();
            exp.extend(head);
            return ExtensionTables { exp, log, modulus };
        }
    }
    unreachable!("every finite field has a primitive element")
}

impl FiniteField {
    /// Build GF(`order`).
    ///
    /// # Errors
    /// [`PottsError::InvalidFieldOrder`] unless `order` is a prime power in
    /// `2..=MAX_FIELD_ORDER`.
    pub fn new(order: u32) -> Result<Self, PottsError> {
        if order > MAX_FIELD_ORDER {
            return Err(PottsError::InvalidFieldOrder(order));
        }
        let (p, k) = prime_power_decomposition(order).ok_or(PottsError::InvalidFieldOrder(order))?;
        let tables = (k > 1).then(|| primitive_tables(p, k));
        Ok(Self {
            order,
            characteristic: p,
            degree: k,
            tables,
        })
    }

    /// Number of elements `q`.
    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// The prime `p` with `q = p^k`.
    #[inline]
    pub fn characteristic(&self) -> u32 {
        self.characteristic
    }

    /// The exponent `k` with `q = p^k`.
    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// `true` for prime fields.
    #[inline]
    pub fn is_prime(&self) -> bool {
        self.degree == 1
    }

    #[inline]
    pub fn zero(&self) -> FieldElement {
        0
    }

    #[inline]
    pub fn one(&self) -> FieldElement {
        1
    }

    /// Map a signed integer into the prime subfield.
    #[inline]
    pub fn from_int(&self, value: i64) -> FieldElement {
        value.rem_euclid(self.characteristic as i64) as FieldElement
    }

    #[inline]
    pub fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        let p = self.characteristic;
        if self.degree == 1 {
            return ((a as u64 + b as u64) % p as u64) as FieldElement;
        }
        let (mut a, mut b) = (a, b);
        let mut out = 0;
        let mut place = 1;
        for _ in 0..self.degree {
            out += ((a % p + b % p) % p) * place;
            a /= p;
            b /= p;
            place *= p;
        }
        out
    }

    #[inline]
    pub fn neg(&self, a: FieldElement) -> FieldElement {
        let p = self.characteristic;
        if self.degree == 1 {
            return (p - a % p) % p;
        }
        let mut a = a;
        let mut out = 0;
        let mut place = 1;
        for _ in 0..self.degree {
            out += ((p - a % p) % p) * place;
            a /= p;
            place *= p;
        }
        out
    }

    #[inline]
    pub fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        self.add(a, self.neg(b))
    }

    #[inline]
    pub fn mul(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        if a == 0 || b == 0 {
            return 0;
        }
        match &self.tables {
            None => ((a as u64 * b as u64) % self.order as u64) as FieldElement,
            Some(t) => t.exp[(t.log[a as usize] + t.log[b as usize]) as usize],
        }
    }

    /// `a + c·b`, the column-operation kernel.
    #[inline]
    pub fn mul_add(&self, a: FieldElement, c: FieldElement, b: FieldElement) -> FieldElement {
        self.add(a, self.mul(c, b))
    }

    /// Raise `a` to the power `e` (with `0^0 = 1`).
    pub fn pow(&self, a: FieldElement, mut e: u64) -> FieldElement {
        let mut base = a;
        let mut acc = 1;
        while e > 0 {
            if e & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        acc
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn inv(&self, a: FieldElement) -> Option<FieldElement> {
        if a == 0 {
            return None;
        }
        match &self.tables {
            None => Some(self.pow(a, self.order as u64 - 2)),
            Some(t) => {
                let l = t.log[a as usize];
                Some(t.exp[((self.order - 1 - l) % (self.order - 1)) as usize])
            }
        }
    }

    /// `a / b`, `None` when `b` is zero.
    pub fn div(&self, a: FieldElement, b: FieldElement) -> Option<FieldElement> {
        self.inv(b).map(|ib| self.mul(a, ib))
    }

    /// Uniform element of the field.
    #[inline]
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        rng.gen_range(0..self.order)
    }

    /// Uniform nonzero element of the field.
    #[inline]
    pub fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        rng.gen_range(1..self.order)
    }

    /// Vector of independent uniform elements.
    pub fn random_vector<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Vec<FieldElement> {
        (0..len).map(|_| self.random(rng)).collect()
    }

    /// Dot product of two equally long vectors.
    pub fn dot(&self, a: &[FieldElement], b: &[FieldElement]) -> FieldElement {
        a.iter()
            .zip(b)
            .fold(0, |acc, (&x, &y)| self.mul_add(acc, x, y))
    }

    /// Low coefficients of the primitive modulus for extension fields.
    pub fn modulus(&self) -> Option<&[u32]> {
        self.tables.as_ref().map(|t| t.modulus.as_slice())
    }
}
