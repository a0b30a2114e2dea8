//! Pointer gestures delivered by the host viewer

/// Kind of pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Click,
    DragStart,
    DragMove,
    DragEnd,
}

/// Modifier keys held during a gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub meta: bool,
    pub ctrl: bool,
}

/// A pointer gesture in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Position along the x axis in data units (phase for phase viewers)
    pub domain_x: f64,
    pub modifiers: Modifiers,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, domain_x: f64) -> Self {
        Self {
            kind,
            domain_x,
            modifiers: Modifiers::default(),
        }
    }

    pub fn click(domain_x: f64) -> Self {
        Self::new(GestureKind::Click, domain_x)
    }

    pub fn drag_start(domain_x: f64) -> Self {
        Self::new(GestureKind::DragStart, domain_x)
    }

    pub fn drag_move(domain_x: f64) -> Self {
        Self::new(GestureKind::DragMove, domain_x)
    }

    pub fn drag_end(domain_x: f64) -> Self {
        Self::new(GestureKind::DragEnd, domain_x)
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}
