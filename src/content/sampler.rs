//! Deterministic sampling of daily tasks.
//!
//! The same `(items, count, seed)` always yields the same selection, on any
//! machine, with no source of entropy. A 32-bit string hash of the seed picks
//! a start index and a stride; the cursor walks the pool by that stride and
//! takes every index it has not taken yet.
//!
//! Both hashes consume the seed as UTF-16 code units (the first unit of each
//! code point) with wrapping 32-bit arithmetic:
//!
//! - FNV-1a: `h = 2166136261; h = (h ^ unit) * 16777619`
//! - DJB2-xor: `h = 5381; h = (h * 33) ^ unit`

/// Seed hash used by a task domain. Changing a domain's hash changes every
/// past and future selection for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedHash {
    #[default]
    Fnv1a,
    Djb2Xor,
}

fn first_units(seed: &str) -> impl Iterator<Item = u32> + '_ {
    seed.chars().map(|ch| {
        let mut buf = [0u16; 2];
        ch.encode_utf16(&mut buf)[0] as u32
    })
}

impl SeedHash {
    pub fn hash(&self, seed: &str) -> u32 {
        match self {
            Self::Fnv1a => first_units(seed).fold(2_166_136_261u32, |h, unit| {
                (h ^ unit).wrapping_mul(16_777_619)
            }),
            Self::Djb2Xor => {
                first_units(seed).fold(5381u32, |h, unit| h.wrapping_mul(33) ^ unit)
            }
        }
    }
}

/// Pick up to `count` distinct items using the default (FNV-1a) seed hash
pub fn sample<'a, T>(items: &'a [T], count: usize, seed: &str) -> Vec<&'a T> {
    sample_with(items, count, seed, SeedHash::Fnv1a)
}

/// Pick up to `count` distinct items, in visiting order.
///
/// When the stride shares a factor with the pool size the walk returns to its
/// starting index before covering the pool; it then continues from the next
/// untaken index with the same stride.
pub fn sample_with<'a, T>(items: &'a [T], count: usize, seed: &str, hash: SeedHash) -> Vec<&'a T> {
    let len = items.len();
    if len == 0 {
        return Vec::new();
    }

    let target = count.min(len);
    let seed = hash.hash(seed) as usize;
    let step = (seed % (len - 1).max(1)) + 1;
    let mut cursor = seed % len;
    let mut orbit_start = cursor;
    let mut taken = vec![false; len];
    let mut picked = Vec::with_capacity(target);

    while picked.len() < target {
        if !taken[cursor] {
            taken[cursor] = true;
            picked.push(&items[cursor]);
        }
        cursor = (cursor + step) % len;

        if cursor == orbit_start && picked.len() < target {
            while taken[cursor] {
                cursor = (cursor + 1) % len;
            }
            orbit_start = cursor;
        }
    }

    picked
}
