use super::element::ElementId;

/// Handle for a pending frame or timer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Source of frame callbacks and delayed callbacks for counters.
///
/// Implementations call back into the owner of the [`CounterBoard`]
/// (`on_frame` / `on_timer`) with the element the request was made for.
///
/// [`CounterBoard`]: super::CounterBoard
pub trait Scheduler {
    /// Ask for one callback on the next rendered frame.
    fn request_frame(&mut self, element: ElementId) -> TaskHandle;

    /// Ask for one callback after `delay_ms`.
    fn set_timeout(&mut self, element: ElementId, delay_ms: u32) -> TaskHandle;

    /// Drop a pending request. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Where counter text ends up.
pub trait TextSurface {
    fn set_text(&mut self, element: ElementId, text: &str);
}
