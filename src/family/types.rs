/// IP address family a detection runs for.
///
/// Selects which endpoint table entry applies and which address-family
/// validation rule a raw detection result must pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}
