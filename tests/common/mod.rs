#![allow(dead_code)]

use handsign::image::Mask;
use nalgebra::{point, Point2};

include!("masks.rs");
