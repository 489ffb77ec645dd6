//! The reserved slot-index map of the library.
//!
//! Indices are the stable wire contract between modules: a consumer
//! addresses its producer's outputs by these numbers, never by name.
//! Indices 0–9 belong to the scheduler (`time`, `stop`, `lconv`,
//! `endtime`, `min_alt`, `min_range`); each library module owns one of
//! the ranges below.

use traject_core::SlotIdx;

// ── environment (10–19) ────────────────────────────────────────────

/// Gravity acceleration magnitude - m/s² (out).
pub const GRAV: SlotIdx = SlotIdx(10);
/// Gravity override; 0 selects the standard value - m/s² (data).
pub const GRAV0: SlotIdx = SlotIdx(11);
/// Air density - kg/m³ (out).
pub const RHO: SlotIdx = SlotIdx(12);
/// Density override; 0 selects sea level - kg/m³ (data).
pub const RHO0: SlotIdx = SlotIdx(13);

// ── kinematics (20–39) ─────────────────────────────────────────────

/// Position in Earth frame, z down - m (state).
pub const SBEL: SlotIdx = SlotIdx(20);
/// Velocity in Earth frame - m/s (state).
pub const VBEL: SlotIdx = SlotIdx(21);
/// Altitude above ground - m (out).
pub const ALTITUDE: SlotIdx = SlotIdx(22);
/// Initial position components - m (init).
pub const SBEL1: SlotIdx = SlotIdx(23);
/// Second initial position component - m (init).
pub const SBEL2: SlotIdx = SlotIdx(24);
/// Third initial position component - m (init).
pub const SBEL3: SlotIdx = SlotIdx(25);
/// Initial velocity components - m/s (init).
pub const VBEL1: SlotIdx = SlotIdx(26);
/// Second initial velocity component - m/s (init).
pub const VBEL2: SlotIdx = SlotIdx(27);
/// Third initial velocity component - m/s (init).
pub const VBEL3: SlotIdx = SlotIdx(28);
/// Previous-step specific force, integrator priming - m/s² (save).
pub const ACC_PREV: SlotIdx = SlotIdx(30);

// ── forces (40–49) ─────────────────────────────────────────────────

/// Drag coefficient - ND (data).
pub const CD: SlotIdx = SlotIdx(40);
/// Reference area - m² (data).
pub const AREA: SlotIdx = SlotIdx(41);
/// Speed - m/s (out).
pub const DVBE: SlotIdx = SlotIdx(42);
/// Specific force in Earth frame - m/s² (out).
pub const FSPE: SlotIdx = SlotIdx(43);

// ── propulsion (50–59) ─────────────────────────────────────────────

/// Motor status: 1 burning, 0 off - ND (out).
pub const MPROP: SlotIdx = SlotIdx(50);
/// Specific impulse - s (data).
pub const SPI: SlotIdx = SlotIdx(51);
/// Fuel flow rate - kg/s (data).
pub const FUEL_FLOW: SlotIdx = SlotIdx(52);
/// Initial fuel mass - kg (data).
pub const FMASS0: SlotIdx = SlotIdx(53);
/// Initial vehicle mass - kg (data).
pub const VMASS0: SlotIdx = SlotIdx(54);
/// Thrust - N (out).
pub const THRUST: SlotIdx = SlotIdx(55);
/// Current vehicle mass - kg (out).
pub const VMASS: SlotIdx = SlotIdx(56);
/// Fuel mass expended - kg (state).
pub const FMASSE: SlotIdx = SlotIdx(57);
/// Previous fuel-flow derivative, integrator priming - kg/s (save).
pub const FMASSD: SlotIdx = SlotIdx(58);

// ── tvc (70–93) ────────────────────────────────────────────────────

/// TVC mode: 0 off, 1 no dynamics, 2 second order - ND (data).
pub const MTVC: SlotIdx = SlotIdx(70);
/// Nozzle deflection gain - ND (data).
pub const GTVC: SlotIdx = SlotIdx(71);
/// Nozzle deflection limiter - deg (data).
pub const TVCLIMX: SlotIdx = SlotIdx(72);
/// Nozzle rate limiter - deg/s (data).
pub const DTVCLIMX: SlotIdx = SlotIdx(73);
/// TVC natural frequency - rad/s (data).
pub const WNTVC: SlotIdx = SlotIdx(74);
/// TVC damping - ND (data).
pub const ZETTVC: SlotIdx = SlotIdx(75);
/// Propulsion moment arm to the cg - m (data).
pub const PARM: SlotIdx = SlotIdx(76);
/// Pitch deflection command - deg (data).
pub const DELECX: SlotIdx = SlotIdx(77);
/// Yaw deflection command - deg (data).
pub const DELRCX: SlotIdx = SlotIdx(78);
/// Nozzle pitch deflection - deg (diag).
pub const ETAX: SlotIdx = SlotIdx(79);
/// Nozzle yaw deflection - deg (diag).
pub const ZETX: SlotIdx = SlotIdx(80);
/// Thrust force in body axes - N (out).
pub const FPB: SlotIdx = SlotIdx(81);
/// Thrust moment in body axes - Nm (out).
pub const FMPB: SlotIdx = SlotIdx(82);
/// Pitch nozzle position - rad (state).
pub const ETAS: SlotIdx = SlotIdx(83);
/// Pitch position derivative - rad/s (state).
pub const ETASD: SlotIdx = SlotIdx(84);
/// Pitch nozzle rate - rad/s (state).
pub const DETAS: SlotIdx = SlotIdx(85);
/// Pitch rate derivative - rad/s² (state).
pub const DETASD: SlotIdx = SlotIdx(86);
/// Yaw nozzle position - rad (state).
pub const ZETAS: SlotIdx = SlotIdx(87);
/// Yaw position derivative - rad/s (state).
pub const ZETAD: SlotIdx = SlotIdx(88);
/// Yaw nozzle rate - rad/s (state).
pub const DZETA: SlotIdx = SlotIdx(89);
/// Yaw rate derivative - rad/s² (state).
pub const DZETAD: SlotIdx = SlotIdx(90);

// ── target (100–109) ───────────────────────────────────────────────

/// Target position in Earth frame - m (state).
pub const STEL: SlotIdx = SlotIdx(100);
/// Initial target position components - m (init).
pub const STEL1: SlotIdx = SlotIdx(101);
/// Second initial target position component - m (init).
pub const STEL2: SlotIdx = SlotIdx(102);
/// Third initial target position component - m (init).
pub const STEL3: SlotIdx = SlotIdx(103);
/// Target velocity components - m/s (data).
pub const VTEL1: SlotIdx = SlotIdx(104);
/// Second target velocity component - m/s (data).
pub const VTEL2: SlotIdx = SlotIdx(105);
/// Third target velocity component - m/s (data).
pub const VTEL3: SlotIdx = SlotIdx(106);

// ── seeker (120–129) ───────────────────────────────────────────────

/// Range to target - m (out).
pub const DTA: SlotIdx = SlotIdx(120);
/// Closing velocity, positive closing - m/s (out).
pub const DVTA: SlotIdx = SlotIdx(121);
/// Unit line-of-sight vector - ND (out).
pub const UTBL: SlotIdx = SlotIdx(122);

// ── intercept (140–149) ────────────────────────────────────────────

/// Miss distance, frozen at closest approach - m (out).
pub const MISS: SlotIdx = SlotIdx(140);
/// Intercept detected flag - ND (out).
pub const INTERCEPT_FLAG: SlotIdx = SlotIdx(141);
/// Previous closing velocity - m/s (save).
pub const DVTA_PREV: SlotIdx = SlotIdx(142);
/// Time of closest approach - s (out).
pub const TINTERCEPT: SlotIdx = SlotIdx(143);
/// Detection sphere radius - m (data).
pub const DETECT_RANGE: SlotIdx = SlotIdx(144);
