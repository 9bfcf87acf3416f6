// panorama.rs — 视角参数与球面朝向求解

use glam::Vec3;

/// 全景球半径，必须与球体几何一致，相机才不会穿出球面
pub const SPHERE_RADIUS: f32 = 500.0;
pub const SPHERE_WIDTH_SEGMENTS: u32 = 60;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 40;

pub const MIN_LATITUDE: f32 = -85.0;
pub const MAX_LATITUDE: f32 = 85.0;

pub const MIN_FOV: f32 = 30.0;
pub const MAX_FOV: f32 = 90.0;
pub const DEFAULT_FOV: f32 = 75.0;

/// 相机放在球心附近而不是正好球心，避免 look_at 退化
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 0.1);

/// Camera orientation inside the panorama sphere, in degrees.
///
/// Longitude is unbounded and wraps through the trigonometry. Latitude and
/// field of view are kept inside their limits by the setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    longitude_deg: f32,
    latitude_deg: f32,
    fov_deg: f32,
}

impl OrbitState {
    pub fn new() -> Self {
        Self {
            longitude_deg: 0.0,
            latitude_deg: 0.0,
            fov_deg: DEFAULT_FOV,
        }
    }

    pub fn longitude(&self) -> f32 {
        self.longitude_deg
    }

    pub fn latitude(&self) -> f32 {
        self.latitude_deg
    }

    pub fn fov(&self) -> f32 {
        self.fov_deg
    }

    pub fn set_angles(&mut self, longitude_deg: f32, latitude_deg: f32) {
        self.longitude_deg = longitude_deg;
        self.latitude_deg = clamp_latitude(latitude_deg);
    }

    pub fn set_fov(&mut self, fov_deg: f32) {
        self.fov_deg = fov_deg.clamp(MIN_FOV, MAX_FOV);
    }

    /// Point on the panorama sphere the camera should face.
    pub fn look_at(&self) -> Vec3 {
        compute_look_at(self.longitude_deg, self.latitude_deg, SPHERE_RADIUS)
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn clamp_latitude(latitude_deg: f32) -> f32 {
    latitude_deg.clamp(MIN_LATITUDE, MAX_LATITUDE)
}

/// Spherical to cartesian conversion used for the camera target.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth in the XZ
/// plane. Latitude is clamped first so the target never reaches a pole.
pub fn compute_look_at(longitude_deg: f32, latitude_deg: f32, radius: f32) -> Vec3 {
    let lat = clamp_latitude(latitude_deg);
    let phi = (90.0 - lat).to_radians();
    let theta = longitude_deg.to_radians();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_look_at_clamps_latitude() {
        let clamped = compute_look_at(30.0, 85.0, SPHERE_RADIUS);
        assert_eq!(compute_look_at(30.0, 200.0, SPHERE_RADIUS), clamped);
        assert_eq!(
            compute_look_at(30.0, -200.0, SPHERE_RADIUS),
            compute_look_at(30.0, -85.0, SPHERE_RADIUS)
        );
    }

    #[test]
    fn test_look_at_horizon() {
        // lon=0, lat=0 朝 +X
        assert_vec_close(compute_look_at(0.0, 0.0, 500.0), Vec3::new(500.0, 0.0, 0.0));
        // lon=90 朝 +Z
        assert_vec_close(compute_look_at(90.0, 0.0, 500.0), Vec3::new(0.0, 0.0, 500.0));
    }

    #[test]
    fn test_look_at_stays_on_sphere() {
        for (lon, lat) in [(0.0, 0.0), (123.0, 45.0), (-720.0, -60.0), (10.0, 85.0)] {
            let p = compute_look_at(lon, lat, SPHERE_RADIUS);
            assert!((p.length() - SPHERE_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn test_longitude_wraps() {
        assert_vec_close(
            compute_look_at(30.0, 20.0, SPHERE_RADIUS),
            compute_look_at(390.0, 20.0, SPHERE_RADIUS),
        );
    }

    #[test]
    fn test_orbit_state_setters_clamp() {
        let mut orbit = OrbitState::new();
        assert_eq!(orbit.fov(), DEFAULT_FOV);

        orbit.set_angles(400.0, 120.0);
        assert_eq!(orbit.longitude(), 400.0);
        assert_eq!(orbit.latitude(), MAX_LATITUDE);

        orbit.set_fov(10.0);
        assert_eq!(orbit.fov(), MIN_FOV);
        orbit.set_fov(1000.0);
        assert_eq!(orbit.fov(), MAX_FOV);
    }
}
