//! Frame-to-frame gesture tracking.

use crate::{
    error::{CalibrationError, Error},
    image::{Mask, Rect},
    resolution::Resolution,
};

use super::{
    calibration::{Handedness, Profile},
    detection::HandDetector,
    finger::FingerExtractor,
    gesture::{GestureClassifier, GestureType, SplitPolicy},
    palm::{Palm, PalmSmoother},
    shape::HandShape,
    Hand,
};

/// Configuration of a [`GestureTracker`].
///
/// All values default to the `DEFAULT_*` constants of the stage they configure.
///
/// ```
/// # use handsign::hand::{gesture::SplitPolicy, tracking::TrackerOptions};
/// let options = TrackerOptions::default()
///     .min_hand_area(5000.0)
///     .split_policy(SplitPolicy::FingerCount);
/// ```
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    min_hand_area: f32,
    min_defect_depth: f32,
    finger_ratio: (f32, f32),
    retry_below: usize,
    retry_growth: f32,
    fist_ratio: f32,
    slope_thresh: f32,
    walk_step: usize,
    split_policy: SplitPolicy,
    history: usize,
    resolution: Option<Resolution>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            min_hand_area: HandDetector::DEFAULT_MIN_HAND_AREA,
            min_defect_depth: HandShape::DEFAULT_MIN_DEFECT_DEPTH,
            finger_ratio: (
                FingerExtractor::DEFAULT_MIN_FINGER_RATIO,
                FingerExtractor::DEFAULT_MAX_FINGER_RATIO,
            ),
            retry_below: FingerExtractor::DEFAULT_RETRY_BELOW,
            retry_growth: FingerExtractor::DEFAULT_RETRY_GROWTH,
            fist_ratio: GestureClassifier::DEFAULT_FIST_RATIO,
            slope_thresh: GestureClassifier::DEFAULT_SLOPE_THRESH,
            walk_step: GestureClassifier::DEFAULT_WALK_STEP,
            split_policy: SplitPolicy::default(),
            history: PalmSmoother::DEFAULT_HISTORY,
            resolution: None,
        }
    }
}

impl TrackerOptions {
    /// See [`HandDetector::set_min_hand_area`].
    pub fn min_hand_area(mut self, area: f32) -> Self {
        self.min_hand_area = area;
        self
    }

    /// Sets the minimum depth of a convexity defect, in pixels.
    pub fn min_defect_depth(mut self, depth: f32) -> Self {
        self.min_defect_depth = depth;
        self
    }

    /// See [`FingerExtractor::set_finger_ratio`].
    pub fn finger_ratio(mut self, min: f32, max: f32) -> Self {
        self.finger_ratio = (min, max);
        self
    }

    /// See [`FingerExtractor::set_retry`].
    pub fn retry(mut self, below: usize, growth: f32) -> Self {
        self.retry_below = below;
        self.retry_growth = growth;
        self
    }

    /// See [`GestureClassifier::set_fist_ratio`].
    pub fn fist_ratio(mut self, ratio: f32) -> Self {
        self.fist_ratio = ratio;
        self
    }

    pub fn slope_thresh(mut self, thresh: f32) -> Self {
        self.slope_thresh = thresh;
        self
    }

    /// See [`GestureClassifier::set_walk_step`].
    pub fn walk_step(mut self, step: usize) -> Self {
        self.walk_step = step;
        self
    }

    pub fn split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Sets the number of frames the palm is smoothed over.
    pub fn history(mut self, frames: usize) -> Self {
        self.history = frames;
        self
    }

    /// Binds the tracker to a mask resolution; masks of any other size will be rejected.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

/// Result of tracking a single frame.
#[derive(Debug, Clone)]
pub struct Frame {
    hand: Option<Hand>,
}

impl Frame {
    /// Returns the hand found in the frame, if any.
    #[inline]
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn into_hand(self) -> Option<Hand> {
        self.hand
    }

    /// Returns the recognized gesture, or [`GestureType::None`] if there was no hand.
    pub fn gesture(&self) -> GestureType {
        self.hand.as_ref().map_or(GestureType::None, |hand| hand.gesture())
    }
}

/// Recognizes gestures in a stream of skin masks.
///
/// The tracker owns the state that carries over between frames: the palm smoothing history and
/// the calibration [`Profile`] of the current user. Frames of one stream have to be passed to the
/// same tracker in order; independent streams need independent trackers.
pub struct GestureTracker {
    detector: HandDetector,
    min_defect_depth: f32,
    extractor: FingerExtractor,
    classifier: GestureClassifier,
    smoother: PalmSmoother,
    profile: Option<Profile>,
    resolution: Option<Resolution>,
}

impl GestureTracker {
    /// Creates a tracker using the default configuration.
    pub fn new() -> Self {
        Self::with_options(TrackerOptions::default())
    }

    /// Creates a tracker from `options`.
    ///
    /// # Panics
    ///
    /// Panics if the smoothing history or the walk step is set to 0.
    pub fn with_options(options: TrackerOptions) -> Self {
        let mut detector = HandDetector::new();
        detector.set_min_hand_area(options.min_hand_area);

        let mut extractor = FingerExtractor::new();
        extractor.set_finger_ratio(options.finger_ratio.0, options.finger_ratio.1);
        extractor.set_retry(options.retry_below, options.retry_growth);

        let mut classifier = GestureClassifier::new();
        classifier.set_split_policy(options.split_policy);
        classifier.set_fist_ratio(options.fist_ratio);
        classifier.set_slope_thresh(options.slope_thresh);
        classifier.set_walk_step(options.walk_step);

        Self {
            detector,
            min_defect_depth: options.min_defect_depth,
            extractor,
            classifier,
            smoother: PalmSmoother::with_history(options.history),
            profile: None,
            resolution: options.resolution,
        }
    }

    /// Processes the next frame of the stream.
    ///
    /// `faces` are the bounding rectangles of all faces in the frame; skin regions touching them
    /// are not considered to be hands.
    ///
    /// Only a mask of the wrong size is an error. Frames without a hand result in a [`Frame`]
    /// without a [`Hand`], and they reset the palm smoothing.
    pub fn track(&mut self, mask: &Mask, faces: &[Rect]) -> Result<Frame, Error> {
        self.check_resolution(mask)?;

        let Some(shape) = self.find_hand(mask, faces) else {
            if !self.smoother.is_empty() {
                log::debug!("hand lost, resetting palm smoothing");
            }
            self.smoother.reset();
            return Ok(Frame { hand: None });
        };

        let raw_palm = Palm::from_shape(&shape);
        let palm = self.smoother.smooth(raw_palm);
        let mut fingers = self.extractor.extract(mask, &shape, &palm);

        let handedness = match &self.profile {
            Some(profile) => {
                profile.label(&mut fingers);
                profile.handedness()
            }
            None => Handedness::from_shape(&shape),
        };
        let gesture = self.classifier.classify(
            &shape,
            &palm,
            &fingers,
            handedness,
            self.profile.as_ref(),
        );

        let hand = Hand::new(shape, raw_palm, palm, fingers, handedness, gesture);
        log::trace!("hand found:\n{hand}");
        Ok(Frame { hand: Some(hand) })
    }

    /// Calibrates the tracker using a mask of the user's hand with all fingers spread.
    ///
    /// The sample is analyzed on its own: palm smoothing is neither used nor updated. On success,
    /// the new [`Profile`] replaces the previous one. On failure, the previous profile (if any) is
    /// kept.
    pub fn calibrate(&mut self, mask: &Mask, faces: &[Rect]) -> Result<&Profile, Error> {
        self.check_resolution(mask)?;

        let shape = self
            .find_hand(mask, faces)
            .ok_or(CalibrationError::NoHand)?;
        let palm = Palm::from_shape(&shape);
        if palm.is_degenerate() {
            return Err(CalibrationError::DegenerateGeometry.into());
        }

        let mut fingers = self.extractor.extract(mask, &shape, &palm);
        let handedness = Handedness::from_shape(&shape);
        let profile = Profile::calibrate(&mut fingers, handedness)?;
        log::debug!(
            "calibrated {handedness:?} hand, finger angles: {:?}",
            profile
                .angles()
                .iter()
                .map(|a| a.to_degrees())
                .collect::<Vec<_>>()
        );
        Ok(&*self.profile.insert(profile))
    }

    /// Returns the current calibration profile.
    #[inline]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Replaces the calibration profile, e.g. with one cached from an earlier session.
    pub fn set_profile(&mut self, profile: Option<Profile>) {
        self.profile = profile;
    }

    /// Forgets the palm smoothing history. The calibration profile is kept.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    fn find_hand(&self, mask: &Mask, faces: &[Rect]) -> Option<HandShape> {
        let contour = self.detector.detect(mask, faces)?;
        HandShape::with_min_defect_depth(contour, self.min_defect_depth)
    }

    fn check_resolution(&self, mask: &Mask) -> Result<(), Error> {
        match self.resolution {
            Some(expected) if expected != mask.resolution() => {
                log::warn!("rejecting {} mask, expected {}", mask.resolution(), expected);
                Err(Error::MaskSize {
                    expected,
                    actual: mask.resolution(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}
