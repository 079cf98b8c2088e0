//! Configuration-format and session-processing tests.
//!
//! Drives the full path the binary uses: configuration text → catalog →
//! machine → settings lines → grouped output. The naval configuration
//! below matches the historical wiring tables; the grouped output lines
//! are frozen snapshots.

use enigma::config::{self, MachineConfig};
use enigma::EnigmaError;

const NAVAL_CONF: &str = "\
A-Z
5 3
I     MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II    ME  (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III   MV  (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
IV    MJ  (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
V     MZ  (AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)
VI    MZM (AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)
VII   MZM (ANOUPFRIMBZTLWKSVEGCJYDHXQ)
VIII  MZM (AFLSETWUNDHOZVICQ) (BKJ) (GXY) (MPR)
Beta  N   (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
B     R   (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
C     R   (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)
";

// ═══════════════════════════════════════════════════════════════════════
// Catalog parsing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn parses_naval_configuration() {
    let parsed = MachineConfig::parse(NAVAL_CONF).unwrap();
    assert_eq!(parsed.alphabet().size(), 26);
    assert_eq!(parsed.num_rotors(), 5);
    assert_eq!(parsed.num_pawls(), 3);
    parsed.build().unwrap();
}

/// A multi-group token without internal spaces, as in rotor V's wiring,
/// parses the same as a spaced one.
#[test]
fn adjacent_cycle_groups_in_one_token() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    config::apply_settings(&mut machine, "* B Beta I II V AAAA").unwrap();
    assert_eq!(machine.setting(), "AAAAA");
}

#[test]
fn rejects_reflector_with_fixed_point() {
    let source = "A-D\n2 1\nR1 R (AC)\nM1 MC (ABCD)\n";
    let err = MachineConfig::parse(source).unwrap_err();
    assert_eq!(err, EnigmaError::InvalidReflectorWiring("R1".to_string()));
}

#[test]
fn rejects_ambiguous_cycle_specification() {
    let source = "A-D\n2 1\nR1 R (AC) (CB)\nM1 MC (ABCD)\n";
    let err = MachineConfig::parse(source).unwrap_err();
    assert!(matches!(err, EnigmaError::MalformedPermutation(_)));
}

#[test]
fn rejects_pawls_not_below_rotors() {
    let source = "A-D\n2 2\nR1 R (AC) (BD)\nM1 MC (ABCD)\n";
    let err = MachineConfig::parse(source).unwrap().build().unwrap_err();
    assert!(matches!(err, EnigmaError::RotorCountMismatch { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Session processing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn processes_reference_session() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let input = "\
* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM his shoulder Hiawatha
Took the camera of rosewood
";
    let output = config::process_lines(&mut machine, input).unwrap();
    assert_eq!(
        output,
        "QVPQS OKOIL PUBKJ ZPISF XDW\nBHCNS CXNUO AATZX SRCFY DGU\n"
    );
}

/// Decrypting is the same session run over the grouped ciphertext.
#[test]
fn reference_session_round_trips() {
    let settings = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n";
    let mut encoder = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let cipher = config::process_lines(
        &mut encoder,
        &format!("{}FROM his shoulder Hiawatha\n", settings),
    )
    .unwrap();

    let mut decoder = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let plain = config::process_lines(&mut decoder, &format!("{}{}", settings, cipher)).unwrap();
    assert_eq!(plain, "FROMH ISSHO ULDER HIAWA THA\n");
}

/// A later settings line starts a fresh session: same rotors and setting
/// give the same ciphertext for the same message.
#[test]
fn new_settings_line_resets_session() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let input = "\
* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM his shoulder Hiawatha
* B Beta III IV I AXLE
FROM his shoulder Hiawatha
";
    let output = config::process_lines(&mut machine, input).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "QVPQS OKOIL PUBKJ ZPISF XDW");
    // Same rotors and positions, but the plugboard persisted from the
    // first session, so the second line repeats the first.
    assert_eq!(lines[1], lines[0]);
}

#[test]
fn session_rejects_unknown_rotor() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err =
        config::process_lines(&mut machine, "* B Beta III IV IX AXLE\nHELLO\n").unwrap_err();
    assert_eq!(err, EnigmaError::UnknownRotorName("IX".to_string()));
}

#[test]
fn session_rejects_duplicate_rotor() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err = config::process_lines(&mut machine, "* B Beta I I II AXLE\nHELLO\n").unwrap_err();
    assert!(matches!(err, EnigmaError::SlotOrderingViolation(_)));
}

#[test]
fn session_rejects_reflector_in_moving_slot() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err = config::process_lines(&mut machine, "* B Beta III IV C AXLE\nHELLO\n").unwrap_err();
    assert!(matches!(err, EnigmaError::SlotOrderingViolation(_)));
}

#[test]
fn session_rejects_fixed_rotor_in_pawl_slot() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err =
        config::process_lines(&mut machine, "* B Beta III IV Gamma AXLE\nHELLO\n").unwrap_err();
    assert!(matches!(err, EnigmaError::SlotOrderingViolation(_)));
}

#[test]
fn session_rejects_short_position_string() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err = config::process_lines(&mut machine, "* B Beta III IV I AXL\nHELLO\n").unwrap_err();
    assert!(matches!(err, EnigmaError::RotorCountMismatch { .. }));
}

#[test]
fn message_with_symbol_outside_alphabet_fails() {
    let mut machine = MachineConfig::parse(NAVAL_CONF).unwrap().build().unwrap();
    let err =
        config::process_lines(&mut machine, "* B Beta III IV I AXLE\nHELLO?\n").unwrap_err();
    assert_eq!(err, EnigmaError::InvalidSymbol('?'));
}
