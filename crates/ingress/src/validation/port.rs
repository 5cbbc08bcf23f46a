/// Something that may hold a TCP/UDP port number.
///
/// Implemented for strings (digits only, no sign or whitespace) and for every
/// primitive integer type.
pub trait PortCandidate {
    /// The port, if the value is an integer in `1..=65535`.
    fn to_port(&self) -> Option<u16>;
}

impl PortCandidate for str {
    fn to_port(&self) -> Option<u16> {
        if self.is_empty() || !self.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Digit-only strings too long for u32 are out of range anyway.
        self.parse::<u32>().ok().and_then(|n| n.to_port())
    }
}

impl PortCandidate for String {
    fn to_port(&self) -> Option<u16> {
        self.as_str().to_port()
    }
}

impl<T: PortCandidate + ?Sized> PortCandidate for &T {
    fn to_port(&self) -> Option<u16> {
        (**self).to_port()
    }
}

macro_rules! impl_port_candidate_for_int {
    ($($t:ty),*) => {
        $(
            impl PortCandidate for $t {
                fn to_port(&self) -> Option<u16> {
                    u16::try_from(*self).ok().filter(|port| *port != 0)
                }
            }
        )*
    };
}

impl_port_candidate_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Whether `value` is a usable port number (`1..=65535`).
pub fn is_valid_port<P: PortCandidate + ?Sized>(value: &P) -> bool {
    value.to_port().is_some()
}
