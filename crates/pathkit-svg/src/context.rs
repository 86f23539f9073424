//! Traversal context and cancellation.
//!
//! A [`RenderContext`] is built at the document root and refined by each
//! group on the way down. Nodes never point back at their parents.

use std::sync::Arc;

use pathkit_common::RenderConfig;
use tokio::sync::{mpsc, watch};

use crate::tree::Group;
use crate::Transform;

/// Cooperative cancellation signal shared by every producer of one render.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Fires the paired [`CancelToken`]s.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Create a connected handle and token.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped first.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}

/// Outcome of [`send_or_cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Sent,
    /// The receiver is gone.
    Closed,
    Cancelled,
}

/// Send on a bounded channel, giving up if the render is cancelled while
/// waiting for capacity.
pub(crate) async fn send_or_cancel<T>(
    tx: &mpsc::Sender<T>,
    item: T,
    cancel: &CancelToken,
) -> Delivery {
    if cancel.is_cancelled() {
        return Delivery::Cancelled;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Delivery::Cancelled,
        sent = tx.send(item) => match sent {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Closed,
        },
    }
}

/// Paint attributes inherited from enclosing groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritedPaint {
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill: Option<String>,
    pub fill_rule: Option<String>,
}

/// Read-only state handed from a parent to its children.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Product of every ancestor transform, root first.
    pub transform: Transform,
    /// Document scale, applied to stroke widths.
    pub scale: f64,
    pub paint: InheritedPaint,
    pub config: Arc<RenderConfig>,
    pub cancel: CancelToken,
}

impl RenderContext {
    pub fn new(config: RenderConfig, cancel: CancelToken) -> Self {
        Self {
            transform: Transform::identity(),
            scale: 1.0,
            paint: InheritedPaint::default(),
            config: Arc::new(config),
            cancel,
        }
    }

    /// Root context for a document scale factor.
    ///
    /// A positive scale is used as is, a negative one as its reciprocal
    /// magnitude (`-4` means `1/4`), and zero as `1`.
    pub fn with_scale(mut self, scale: f64) -> Self {
        let scale = effective_scale(scale);
        self.scale = scale;
        self.transform = self.transform.scale(scale, scale);
        self
    }

    /// Bound for item channels. Never zero.
    pub fn channel_capacity(&self) -> usize {
        self.config.channel_capacity.max(1)
    }

    /// Context for the children of `group`.
    pub fn for_group(&self, group: &Group) -> Self {
        let mut paint = self.paint.clone();
        if group.stroke.is_some() {
            paint.stroke.clone_from(&group.stroke);
        }
        if group.stroke_width.is_some() {
            paint.stroke_width = group.stroke_width;
        }
        if group.fill.is_some() {
            paint.fill.clone_from(&group.fill);
        }
        if group.fill_rule.is_some() {
            paint.fill_rule.clone_from(&group.fill_rule);
        }

        Self {
            transform: self.transform.compose(&group.transform),
            scale: self.scale,
            paint,
            config: Arc::clone(&self.config),
            cancel: self.cancel.clone(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderConfig::default(), CancelToken::never())
    }
}

pub(crate) fn effective_scale(scale: f64) -> f64 {
    if scale > 0.0 {
        scale
    } else if scale < 0.0 {
        1.0 / -scale
    } else {
        1.0
    }
}
