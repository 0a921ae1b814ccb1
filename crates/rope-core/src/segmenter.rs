//! Sample-accurate event segmentation.
//!
//! A render call covers `frame_count` frames and comes with a time-ordered
//! list of events. [`process_with_events`] walks that list and splits the
//! block at every event time: frames before an event are rendered with the
//! state as it was, then the event (and every event at or before the same
//! time) is applied, then rendering resumes.
//!
//! Events stamped earlier than the current position are late. They are
//! applied immediately, before any further frames are rendered, and never
//! reordered.
//!
//! # Example
//!
//! With 512 frames and events at offsets 0, 100, 100 and 300 the renderer
//! sees:
//!
//! ```text
//! handle(0)
//! render(0..100)
//! handle(100) handle(100)
//! render(100..300)
//! handle(300)
//! render(300..512)
//! ```

use crate::types::SampleTime;

/// An event with a sample timestamp.
///
/// Timestamps are absolute sample times on the same clock as the block start
/// passed to [`process_with_events`].
pub trait RenderEvent {
    fn sample_time(&self) -> SampleTime;
}

/// Receiver of the interleaved event and render calls.
pub trait SegmentRenderer<E: ?Sized> {
    /// Apply one event. `now` is the position rendering has reached.
    fn handle_event(&mut self, now: SampleTime, event: &E);

    /// Render `frame_count` frames starting at `frame_offset` within the
    /// block (`now` is the matching absolute time).
    fn render_segment(&mut self, now: SampleTime, frame_offset: usize, frame_count: usize);
}

/// Render `frame_count` frames starting at `start_time`, applying `events`
/// at their timestamps.
///
/// Every frame is rendered exactly once, in order. A `frame_count` of zero
/// renders nothing; events are then left unapplied, as no time passes.
pub fn process_with_events<'e, E, R, I>(
    renderer: &mut R,
    start_time: SampleTime,
    frame_count: usize,
    events: I,
) where
    E: RenderEvent + ?Sized + 'e,
    R: SegmentRenderer<E> + ?Sized,
    I: IntoIterator<Item = &'e E>,
{
    let mut events = events.into_iter().peekable();
    let mut now = start_time;
    let mut frames_remaining = frame_count;

    while frames_remaining > 0 {
        let Some(next_event) = events.peek() else {
            renderer.render_segment(now, frame_count - frames_remaining, frames_remaining);
            return;
        };

        let until_event = next_event.sample_time().saturating_sub(now).max(0);
        let frames_this_segment = usize::try_from(until_event)
            .unwrap_or(usize::MAX)
            .min(frames_remaining);

        if frames_this_segment > 0 {
            renderer.render_segment(now, frame_count - frames_remaining, frames_this_segment);
            frames_remaining -= frames_this_segment;
            now += frames_this_segment as SampleTime;
        }

        // Apply the next event and every simultaneous or late one after it.
        while let Some(event) = events.next_if(|event| event.sample_time() <= now) {
            renderer.handle_event(now, event);
        }
    }
}
