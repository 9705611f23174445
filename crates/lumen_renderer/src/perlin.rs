//! Perlin gradient noise.

use crate::random::random_unit_vector;
use crate::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Gradient noise over 3D space with a 256-cell repeat.
///
/// The lattice tables come from the generator handed to [`Perlin::new`], so two instances
/// built from equally seeded generators produce the same field.
#[derive(Clone)]
pub struct Perlin {
    randvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let randvec = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            randvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let f = p.floor();
        let frac = p - f;

        let i = f.x as i32;
        let j = f.y as i32;
        let k = f.z as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.randvec[idx];
                }
            }
        }

        perlin_interp(&c, frac)
    }

    /// Sum of `depth` octaves with halving weight, as an absolute value.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Trilinear blend of the corner gradients with Hermite smoothing.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight_v = frac - Vec3::new(fi, fj, fk);
                accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                    * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                    * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                    * gradient.dot(weight_v);
            }
        }
    }

    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deterministic_for_seed() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(7));
        let b = Perlin::new(&mut StdRng::seed_from_u64(7));

        for p in [Vec3::new(0.3, 1.7, -2.2), Vec3::new(10.5, 0.0, 3.25)] {
            assert_eq!(a.noise(p), b.noise(p));
            assert_eq!(a.turb(p, 7), b.turb(p, 7));
        }
    }

    #[test]
    fn test_zero_on_lattice_points() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        // Every gradient is dotted with a zero offset at its own corner
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_bounded_and_turb_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(2));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let p = crate::random::random_vec3(&mut rng, -50.0, 50.0);
            let n = perlin.noise(p);
            assert!(n.abs() <= 1.5, "noise {} out of range at {:?}", n, p);
            assert!(perlin.turb(p, 7) >= 0.0);
        }
    }

    #[test]
    fn test_permutations_are_complete() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(4));
        let mut sorted = perlin.perm_x.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
    }
}
