//! Cross-domain register bridge: a request/response pair carried across a
//! pulse synchroniser, one transaction in flight at a time.

/// A pulse that takes `stages` cycles to cross into the receiving domain
/// (two-flop synchronisation by default).
#[derive(Debug, Clone)]
struct PulseSync {
    stages: u8,
    shift: u32,
}

impl PulseSync {
    fn new(stages: u8) -> Self {
        PulseSync { stages, shift: 0 }
    }

    fn fire(&mut self) {
        self.shift |= 1 << (self.stages.saturating_sub(1));
    }

    /// Advance one cycle in the receiving domain; returns `true` on the
    /// cycle the pulse arrives.
    fn advance(&mut self) -> bool {
        let arrived = self.shift & 1 != 0;
        self.shift >>= 1;
        arrived
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegisterRequest {
    pub address: u32,
    pub wdata: u32,
    pub wstrobe: u8,
    pub read: bool,
}

/// Carries one register transaction from the host's register-bus domain
/// into the core's primary domain and the matching response back, never
/// issuing a second request before the first response is received.
#[derive(Debug, Clone)]
pub struct RegisterBridge {
    request_sync: PulseSync,
    response_sync: PulseSync,
    pending_request: Option<RegisterRequest>,
    in_flight: bool,
    response_rdata: u32,
}

impl RegisterBridge {
    pub fn new(stages: u8) -> Self {
        RegisterBridge {
            request_sync: PulseSync::new(stages),
            response_sync: PulseSync::new(stages),
            pending_request: None,
            in_flight: false,
            response_rdata: 0,
        }
    }

    /// Host side: `false` means the bridge is still servicing the
    /// previous transaction and this submission is refused.
    pub fn submit(&mut self, request: RegisterRequest) -> bool {
        if self.in_flight {
            return false;
        }
        self.pending_request = Some(request);
        self.in_flight = true;
        self.request_sync.fire();
        true
    }

    /// Primary-domain side: advance the request synchroniser; returns the
    /// request exactly on the cycle it arrives.
    pub fn poll_request(&mut self) -> Option<RegisterRequest> {
        if self.request_sync.advance() {
            self.pending_request
        } else {
            None
        }
    }

    /// Primary-domain side: once the request has been serviced, send the
    /// read data back across the response synchroniser.
    pub fn respond(&mut self, rdata: u32) {
        self.response_rdata = rdata;
        self.response_sync.fire();
    }

    /// Host side: advance the response synchroniser; returns the read
    /// data exactly on the cycle the response arrives, and frees the
    /// bridge for the next request.
    pub fn poll_response(&mut self) -> Option<u32> {
        if self.response_sync.advance() {
            self.in_flight = false;
            self.pending_request = None;
            Some(self.response_rdata)
        } else {
            None
        }
    }

    pub fn busy(&self) -> bool {
        self.in_flight
    }
}
