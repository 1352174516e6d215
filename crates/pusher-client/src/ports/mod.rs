//! Ports to the outside world: HTTP transport and wall-clock time.

pub mod outbound;

pub use outbound::{
    FixedTimeSource, HttpMethod, HttpRequest, HttpResponse, HttpTransport, SystemTimeSource,
    TimeSource,
};
