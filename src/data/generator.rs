use crate::alignment::Scanner;
use crate::config::GeneratorConfig;
use crate::geometry::{Point3D, PointSet, RotationCatalog, Transform, ROTATION_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Scanners with known ground truth
#[derive(Debug, Clone)]
pub struct SyntheticFixture {
    pub scanners: Vec<Scanner>,

    /// Local-to-global transform of each scanner, index-aligned with `scanners`
    pub ground_truth: Vec<Transform>,

    /// Every distinct physical beacon, in global coordinates
    pub beacons: PointSet,
}

impl SyntheticFixture {
    /// Beacons of scanner `index` in global coordinates
    pub fn global_beacons(&self, index: usize) -> Vec<Point3D> {
        self.ground_truth[index].apply_all(&self.scanners[index].beacons)
    }
}

/// Generate a fixture from `config.seed`
pub fn generate_fixture(config: &GeneratorConfig) -> crate::Result<SyntheticFixture> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    generate_fixture_with_rng(config, &mut rng)
}

/// Generate a fixture.
///
/// Scanner 0 sees `base_beacons` beacons and defines the global frame. Every
/// other scanner sees `shared_beacons` of those plus `noise_beacons` beacons
/// nobody else sees, reported through a random catalog rotation and offset.
pub fn generate_fixture_with_rng<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> crate::Result<SyntheticFixture> {
    if config.scanner_count == 0 {
        return Err(anyhow::anyhow!("Fixture needs at least one scanner"));
    }
    if config.coordinate_range <= 0 {
        return Err(anyhow::anyhow!("coordinate_range must be positive"));
    }
    let side = 2 * config.coordinate_range as u64 + 1;
    // The root scanner sees no noise beacons
    let needed = (config.base_beacons + config.noise_beacons * (config.scanner_count - 1)) as u64;
    if side.saturating_pow(3) < needed {
        return Err(anyhow::anyhow!(
            "coordinate_range {} cannot hold {} distinct beacons",
            config.coordinate_range,
            needed
        ));
    }

    let catalog = RotationCatalog::global();
    let mut beacons = PointSet::with_capacity(needed as usize);
    let base: Vec<Point3D> = (0..config.base_beacons)
        .map(|_| draw_new_beacon(rng, config.coordinate_range, &mut beacons))
        .collect();

    let mut scanners = vec![Scanner::new("scanner 0", base.clone())];
    let mut ground_truth = vec![Transform::identity()];

    for index in 1..config.scanner_count {
        let rotation = catalog.rotations()[rng.gen_range(0..ROTATION_COUNT)];
        let translation = Point3D::new(
            rng.gen_range(-config.translation_range..=config.translation_range),
            rng.gen_range(-config.translation_range..=config.translation_range),
            rng.gen_range(-config.translation_range..=config.translation_range),
        );
        let transform = Transform::new(rotation, translation);

        let mut seen: Vec<Point3D> = base
            .choose_multiple(rng, config.shared_beacons.min(base.len()))
            .copied()
            .collect();
        for _ in 0..config.noise_beacons {
            seen.push(draw_new_beacon(rng, config.coordinate_range, &mut beacons));
        }
        seen.shuffle(rng);

        scanners.push(Scanner::new(
            format!("scanner {}", index),
            transform.inverse().apply_all(&seen),
        ));
        ground_truth.push(transform);
    }

    tracing::debug!(
        scanners = scanners.len(),
        beacons = beacons.len(),
        "Generated synthetic fixture"
    );

    Ok(SyntheticFixture {
        scanners,
        ground_truth,
        beacons,
    })
}

fn draw_new_beacon<R: Rng>(rng: &mut R, range: i32, taken: &mut PointSet) -> Point3D {
    loop {
        let candidate = Point3D::new(
            rng.gen_range(-range..=range),
            rng.gen_range(-range..=range),
            rng.gen_range(-range..=range),
        );
        if taken.insert(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shape() {
        let config = GeneratorConfig::default();
        let fixture = generate_fixture(&config).unwrap();

        assert_eq!(fixture.scanners.len(), config.scanner_count);
        assert_eq!(fixture.ground_truth.len(), config.scanner_count);
        assert!(fixture.ground_truth[0].is_identity());
        assert_eq!(fixture.scanners[0].beacon_count(), config.base_beacons);
        for scanner in &fixture.scanners[1..] {
            assert_eq!(scanner.beacon_count(), config.shared_beacons + config.noise_beacons);
        }
        assert_eq!(
            fixture.beacons.len(),
            config.base_beacons + config.noise_beacons * (config.scanner_count - 1)
        );
    }

    #[test]
    fn test_ground_truth_maps_into_global_beacons() {
        let fixture = generate_fixture(&GeneratorConfig::default()).unwrap();
        for index in 0..fixture.scanners.len() {
            for beacon in fixture.global_beacons(index) {
                assert!(fixture.beacons.contains(&beacon));
            }
        }
    }

    #[test]
    fn test_same_seed_same_fixture() {
        let config = GeneratorConfig::default();
        let a = generate_fixture(&config).unwrap();
        let b = generate_fixture(&config).unwrap();
        assert_eq!(a.scanners, b.scanners);
        assert_eq!(a.ground_truth, b.ground_truth);
    }

    #[test]
    fn test_rejects_impossible_configs() {
        let config = GeneratorConfig {
            scanner_count: 0,
            ..GeneratorConfig::default()
        };
        assert!(generate_fixture(&config).is_err());

        let config = GeneratorConfig {
            coordinate_range: 1,
            base_beacons: 100,
            ..GeneratorConfig::default()
        };
        assert!(generate_fixture(&config).is_err());
    }

    #[test]
    fn test_capacity_check_counts_only_non_root_noise() {
        // A 3x3x3 cube holds exactly 17 base beacons plus 5 noise beacons for each of 2 scanners
        let config = GeneratorConfig {
            scanner_count: 3,
            base_beacons: 17,
            noise_beacons: 5,
            coordinate_range: 1,
            ..GeneratorConfig::default()
        };
        let fixture = generate_fixture(&config).unwrap();
        assert_eq!(fixture.beacons.len(), 27);

        let crowded = GeneratorConfig {
            base_beacons: 18,
            ..config
        };
        assert!(generate_fixture(&crowded).is_err());
    }
}
