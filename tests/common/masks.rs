// Synthetic hand silhouettes. Shared by the unit tests (`src/test.rs`) and the integration tests
// (`tests/common/mod.rs`), which bring `Mask`, `point!` and `Point2` into scope.

/// Center of the palm disk of [`star_mask`] and [`hand_mask`].
pub const STAR_CENTER: Point2<f32> = point![150.0, 170.0];

/// Radius of the palm disk of [`star_mask`] and [`hand_mask`].
pub const STAR_PALM_RADIUS: f32 = 60.0;

/// Finger directions of a fully spread right hand, thumb first (degrees, clockwise from +X).
pub const SPREAD: [f32; 5] = [-165.0, -115.0, -90.0, -65.0, -40.0];

/// Finger directions of [`star_mask`].
pub const STAR: [f32; 5] = [-150.0, -120.0, -90.0, -60.0, -30.0];

/// Palm radius of [`webbed_mask`].
pub const WEBBED_PALM_RADIUS: f32 = 50.0;

const FINGER_LENGTH: f64 = 130.0;
const FINGER_HALF_WIDTH: f64 = 8.0;

/// A filled disk without any defects.
pub fn disk_mask() -> Mask {
    let mut mask = Mask::new(200, 200);
    for y in 0..200 {
        for x in 0..200 {
            let (dx, dy) = (x - 100, y - 100);
            mask.set(x, y, dx * dx + dy * dy <= 50 * 50);
        }
    }
    mask
}

/// Palm disk with 5 evenly spread fingers pointing upwards, no wrist.
pub fn star_mask() -> Mask {
    fingers_mask(STAR_PALM_RADIUS as i32, &STAR, false, false)
}

/// Palm disk with a wrist, and a finger in each of the given directions (degrees).
pub fn hand_mask(angles: &[f32]) -> Mask {
    fingers_mask(STAR_PALM_RADIUS as i32, angles, true, false)
}

/// Palm disk of radius [`WEBBED_PALM_RADIUS`] with fingers in the given directions and no
/// wrist.
///
/// If `webbed` is set, a 4 pixel wide arc just outside of the palm disk joins the bases of all
/// fingers above the palm center.
pub fn webbed_mask(angles: &[f32], webbed: bool) -> Mask {
    fingers_mask(WEBBED_PALM_RADIUS as i32, angles, false, webbed)
}

fn fingers_mask(r: i32, angles: &[f32], wrist: bool, webbed: bool) -> Mask {
    let (cx, cy) = (STAR_CENTER.x as i32, STAR_CENTER.y as i32);
    let dirs = angles
        .iter()
        .map(|a| {
            let a = f64::from(*a).to_radians();
            (a.cos(), a.sin())
        })
        .collect::<Vec<_>>();
    let web = (r + 4) * (r + 4);

    let mut mask = Mask::new(300, 300);
    for y in 0..300 {
        for x in 0..300 {
            let (dx, dy) = (x - cx, y - cy);
            let d2 = dx * dx + dy * dy;
            let palm = d2 <= r * r;
            let webbing = webbed && dy < 0 && d2 <= web;
            let finger = || {
                let (dx, dy) = (f64::from(dx), f64::from(dy));
                dirs.iter().any(|&(ux, uy)| {
                    let along = dx * ux + dy * uy;
                    let perp = (dx * uy - dy * ux).abs();
                    (0.0..=FINGER_LENGTH).contains(&along) && perp <= FINGER_HALF_WIDTH
                })
            };
            let forearm = wrist && (110..=190).contains(&x) && y >= cy;
            mask.set(x, y, palm || webbing || forearm || finger());
        }
    }
    mask
}

/// A square fist with small notches cut into each side, like the gaps between curled fingers.
pub fn fist_mask() -> Mask {
    let mut mask = Mask::new(300, 300);
    let mut fill = |xs: std::ops::Range<i32>, ys: std::ops::Range<i32>, on: bool| {
        for y in ys {
            for x in xs.clone() {
                mask.set(x, y, on);
            }
        }
    };
    fill(100..200, 100..200, true);
    fill(110..114, 100..112, false);
    fill(188..200, 110..114, false);
    fill(186..190, 188..200, false);
    fill(100..112, 186..190, false);
    mask
}

/// Mirrors a mask horizontally.
pub fn mirror(mask: &Mask) -> Mask {
    let (w, h) = (mask.width() as i32, mask.height() as i32);
    let mut mirrored = Mask::new(mask.width(), mask.height());
    for y in 0..h {
        for x in 0..w {
            mirrored.set(w - 1 - x, y, mask.get(x, y));
        }
    }
    mirrored
}
