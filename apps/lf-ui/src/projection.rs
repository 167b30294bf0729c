//! Orthographic projection of 3-D points onto the plot plane.

/// Camera orientation in degrees.
///
/// `yaw_deg` rotates about the z axis, `pitch_deg` tilts the camera above
/// the x-y plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewAngles {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

impl Default for ViewAngles {
    fn default() -> Self {
        Self {
            yaw_deg: -60.0,
            pitch_deg: 30.0,
        }
    }
}

impl ViewAngles {
    pub fn project(&self, p: [f64; 3]) -> [f64; 2] {
        let (sa, ca) = self.yaw_deg.to_radians().sin_cos();
        let (se, ce) = self.pitch_deg.to_radians().sin_cos();
        let [x, y, z] = p;

        let xr = x * ca - y * sa;
        let yr = x * sa + y * ca;
        [xr, z * ce - yr * se]
    }

    pub fn project_all(&self, points: &[[f64; 3]]) -> Vec<[f64; 2]> {
        points.iter().map(|&p| self.project(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_view_drops_depth_axis() {
        let view = ViewAngles {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
        };
        assert_eq!(view.project([1.0, 7.0, 2.0]), [1.0, 2.0]);
    }

    #[test]
    fn point_on_view_axis_maps_to_origin() {
        let view = ViewAngles {
            yaw_deg: 35.0,
            pitch_deg: 20.0,
        };
        let (sa, ca) = view.yaw_deg.to_radians().sin_cos();
        let (se, ce) = view.pitch_deg.to_radians().sin_cos();
        let axis = [ce * sa * 4.0, ce * ca * 4.0, se * 4.0];

        let [u, v] = view.project(axis);
        assert!(u.abs() < 1e-12 && v.abs() < 1e-12, "({u}, {v})");
    }
}
