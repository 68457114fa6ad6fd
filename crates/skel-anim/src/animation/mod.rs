//! Motion track playback
//!
//! This module provides the time side of the evaluator:
//! - Motion frames with a fixed channel layout (root position, root
//!   orientation, then three Euler channels per joint)
//! - Loopable clips spread evenly over a fixed duration
//! - Loop normalisation and bracketing of the previous/next frame
//! - An explicit playback clock advanced once per rendered frame
//!
//! # Example
//!
//! ```rust
//! use skel_anim::animation::{MotionClip, MotionFrame, PlaybackClock};
//!
//! let clip = MotionClip::new(vec![MotionFrame::rest(2); 4], 2.0)?;
//! let mut clock = PlaybackClock::new(clip.duration());
//!
//! let time = clock.tick(0.75);
//! let sample = clip.sample(time);
//! assert_eq!((sample.prev_index, sample.next_index), (1, 2));
//! # Ok::<(), skel_anim::AnimError>(())
//! ```

mod clock;
mod motion;
mod sampling;

pub use clock::PlaybackClock;
pub use motion::{CHANNELS_PER_JOINT, MotionClip, MotionFrame, ROOT_CHANNELS, channel_count};
pub use sampling::{FrameSample, normalize_time, sample_indices};
