//! Register bank primitives, the cross-domain bridge, and the concrete
//! register map this core exposes to a host.

mod bank;
mod cdc;
mod register;

pub use bank::RegisterBank;
pub use cdc::{RegisterBridge, RegisterRequest};
pub use register::{AccessClass, Field, Register};

const PRODUCT_ID: u32 = 0x6169_616d;

fn sign_extend(value: u32, bits: u32) -> i64 {
    let shift = 32 - bits;
    ((value << shift) as i32 >> shift) as i64
}

/// The concrete register map of this core: a `RegisterBank` pre-populated
/// with every peripheral register at its word offset, plus typed
/// accessors so the rest of the crate never pokes at raw bit ranges.
#[derive(Debug)]
pub struct SdrRegisterMap {
    bank: RegisterBank,
    platform: u8,
}

impl SdrRegisterMap {
    /// `ring_buffer_count_log2` sizes the `last_buffer` field's width to
    /// match the spectrometer's configured ring depth.
    pub fn new(platform: u8, ring_buffer_count_log2: u32) -> Self {
        let mut bank = RegisterBank::new();

        bank.install(
            0x00,
            Register::new(
                "product_id",
                vec![Field {
                    name: "product_id",
                    offset: 0,
                    width: 32,
                    access: AccessClass::R,
                }],
                PRODUCT_ID,
            ),
        );

        bank.install(
            0x04,
            Register::new(
                "version",
                vec![
                    Field { name: "bugfix", offset: 0, width: 8, access: AccessClass::R },
                    Field { name: "minor", offset: 8, width: 8, access: AccessClass::R },
                    Field { name: "major", offset: 16, width: 8, access: AccessClass::R },
                    Field { name: "platform", offset: 24, width: 8, access: AccessClass::R },
                ],
                u32::from(platform) << 24,
            ),
        );

        bank.install(
            0x08,
            Register::new(
                "control",
                vec![Field { name: "sdr_reset", offset: 0, width: 1, access: AccessClass::Rw }],
                1,
            ),
        );

        bank.install(
            0x0c,
            Register::new(
                "interrupts",
                vec![
                    Field { name: "spectrometer", offset: 0, width: 1, access: AccessClass::Rsticky },
                    Field { name: "recorder", offset: 1, width: 1, access: AccessClass::Rsticky },
                ],
                0,
            ),
        );

        bank.install(
            0x10,
            Register::new(
                "recorder_control",
                vec![
                    Field { name: "start", offset: 0, width: 1, access: AccessClass::Wpulse },
                    Field { name: "stop", offset: 1, width: 1, access: AccessClass::Wpulse },
                    Field { name: "mode", offset: 2, width: 2, access: AccessClass::Rw },
                    Field { name: "dropped_samples", offset: 4, width: 1, access: AccessClass::R },
                ],
                0,
            ),
        );

        bank.install(
            0x14,
            Register::new(
                "recorder_next_address",
                vec![Field { name: "next_address", offset: 0, width: 32, access: AccessClass::R }],
                0,
            ),
        );

        bank.install(
            0x20,
            Register::new(
                "spectrometer",
                vec![
                    Field { name: "use_ddc_out", offset: 0, width: 1, access: AccessClass::Rw },
                    Field { name: "num_integrations", offset: 1, width: 10, access: AccessClass::Rw },
                    Field { name: "abort", offset: 11, width: 1, access: AccessClass::Wpulse },
                    Field { name: "last_buffer", offset: 12, width: ring_buffer_count_log2.max(1), access: AccessClass::R },
                    Field { name: "peak_detect", offset: 12 + ring_buffer_count_log2.max(1), width: 1, access: AccessClass::Rw },
                ],
                0x3ff << 1,
            ),
        );

        bank.install(
            0x24,
            Register::new(
                "ddc_coeff_addr",
                vec![Field { name: "coeff_waddr", offset: 0, width: 10, access: AccessClass::Rw }],
                0,
            ),
        );

        bank.install(
            0x28,
            Register::new(
                "ddc_coeff",
                vec![
                    Field { name: "coeff_wren", offset: 0, width: 1, access: AccessClass::Wpulse },
                    Field { name: "coeff_wdata", offset: 1, width: 18, access: AccessClass::Rw },
                ],
                0,
            ),
        );

        bank.install(
            0x2c,
            Register::new(
                "ddc_decimation",
                vec![
                    Field { name: "decimation1", offset: 0, width: 7, access: AccessClass::Rw },
                    Field { name: "decimation2", offset: 7, width: 6, access: AccessClass::Rw },
                    Field { name: "decimation3", offset: 13, width: 7, access: AccessClass::Rw },
                ],
                0,
            ),
        );

        bank.install(
            0x30,
            Register::new(
                "ddc_frequency",
                vec![Field { name: "frequency", offset: 0, width: 28, access: AccessClass::Rw }],
                0,
            ),
        );

        // Bit assignment for operations_minus_one{1,2,3}/odd_operations{1,3}
        // is left unspecified beyond "operations_minus_one[1..3], odd_
        // operations[1,3]" in the register table; this lays out one
        // 4-bit field per FIR stage's operation count followed by the two
        // odd-operations flags and the two bypass/enable flags.
        bank.install(
            0x34,
            Register::new(
                "ddc_control",
                vec![
                    Field { name: "operations_minus_one1", offset: 0, width: 4, access: AccessClass::Rw },
                    Field { name: "operations_minus_one2", offset: 4, width: 4, access: AccessClass::Rw },
                    Field { name: "operations_minus_one3", offset: 8, width: 4, access: AccessClass::Rw },
                    Field { name: "odd_operations1", offset: 12, width: 1, access: AccessClass::Rw },
                    Field { name: "odd_operations3", offset: 13, width: 1, access: AccessClass::Rw },
                    Field { name: "bypass2", offset: 14, width: 1, access: AccessClass::Rw },
                    Field { name: "bypass3", offset: 15, width: 1, access: AccessClass::Rw },
                    Field { name: "enable_input", offset: 16, width: 1, access: AccessClass::Rw },
                ],
                0,
            ),
        );

        SdrRegisterMap { bank, platform }
    }

    pub fn bank(&self) -> &RegisterBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut RegisterBank {
        &mut self.bank
    }

    pub fn platform(&self) -> u8 {
        self.platform
    }

    /// Advance every register by one cycle (clears `Wpulse` assertions).
    pub fn tick(&mut self) {
        self.bank.tick();
    }

    pub fn host_write(&mut self, word_offset: u32, data: u32, byte_strobes: u8) -> bool {
        self.bank.write(word_offset, data, byte_strobes)
    }

    pub fn host_read(&mut self, word_offset: u32) -> (u32, bool) {
        self.bank.read(word_offset)
    }

    pub fn interrupt(&self) -> bool {
        self.bank.interrupt()
    }

    fn reg(&self, offset: u32) -> &Register {
        self.bank.get(offset).expect("register map is fully populated")
    }

    fn reg_mut(&mut self, offset: u32) -> &mut Register {
        self.bank.get_mut(offset).expect("register map is fully populated")
    }

    pub fn sdr_reset(&self) -> bool {
        self.reg(0x08).get("sdr_reset") != 0
    }

    pub fn assert_spectrometer_interrupt(&mut self) {
        self.reg_mut(0x0c).assert_sticky("spectrometer");
    }

    pub fn deassert_spectrometer_interrupt(&mut self) {
        self.reg_mut(0x0c).deassert_sticky("spectrometer");
    }

    pub fn assert_recorder_interrupt(&mut self) {
        self.reg_mut(0x0c).assert_sticky("recorder");
    }

    pub fn deassert_recorder_interrupt(&mut self) {
        self.reg_mut(0x0c).deassert_sticky("recorder");
    }

    pub fn take_recorder_start_pulse(&mut self) -> bool {
        self.reg_mut(0x10).take_pulse("start")
    }

    pub fn take_recorder_stop_pulse(&mut self) -> bool {
        self.reg_mut(0x10).take_pulse("stop")
    }

    pub fn recorder_mode(&self) -> u32 {
        self.reg(0x10).get("mode")
    }

    pub fn set_recorder_dropped_samples(&mut self, dropped: bool) {
        self.reg_mut(0x10).set("dropped_samples", dropped as u32);
    }

    pub fn set_recorder_next_address(&mut self, address: u32) {
        self.reg_mut(0x14).set("next_address", address);
    }

    pub fn spectrometer_use_ddc_out(&self) -> bool {
        self.reg(0x20).get("use_ddc_out") != 0
    }

    pub fn spectrometer_num_integrations(&self) -> u32 {
        self.reg(0x20).get("num_integrations")
    }

    pub fn take_spectrometer_abort_pulse(&mut self) -> bool {
        self.reg_mut(0x20).take_pulse("abort")
    }

    pub fn set_spectrometer_last_buffer(&mut self, buffer: u32) {
        self.reg_mut(0x20).set("last_buffer", buffer);
    }

    pub fn spectrometer_peak_detect(&self) -> bool {
        self.reg(0x20).get("peak_detect") != 0
    }

    pub fn ddc_coeff_waddr(&self) -> u16 {
        self.reg(0x24).get("coeff_waddr") as u16
    }

    pub fn take_ddc_coeff_wren_pulse(&mut self) -> bool {
        self.reg_mut(0x28).take_pulse("coeff_wren")
    }

    pub fn ddc_coeff_wdata(&self) -> i64 {
        sign_extend(self.reg(0x28).get("coeff_wdata"), 18)
    }

    pub fn ddc_decimation1(&self) -> u32 {
        self.reg(0x2c).get("decimation1")
    }

    pub fn ddc_decimation2(&self) -> u32 {
        self.reg(0x2c).get("decimation2")
    }

    pub fn ddc_decimation3(&self) -> u32 {
        self.reg(0x2c).get("decimation3")
    }

    pub fn ddc_frequency(&self) -> u32 {
        self.reg(0x30).get("frequency")
    }

    pub fn ddc_operations_minus_one1(&self) -> u32 {
        self.reg(0x34).get("operations_minus_one1")
    }

    pub fn ddc_operations_minus_one2(&self) -> u32 {
        self.reg(0x34).get("operations_minus_one2")
    }

    pub fn ddc_operations_minus_one3(&self) -> u32 {
        self.reg(0x34).get("operations_minus_one3")
    }

    pub fn ddc_odd_operations1(&self) -> bool {
        self.reg(0x34).get("odd_operations1") != 0
    }

    pub fn ddc_odd_operations3(&self) -> bool {
        self.reg(0x34).get("odd_operations3") != 0
    }

    pub fn ddc_bypass2(&self) -> bool {
        self.reg(0x34).get("bypass2") != 0
    }

    pub fn ddc_bypass3(&self) -> bool {
        self.reg(0x34).get("bypass3") != 0
    }

    pub fn ddc_enable_input(&self) -> bool {
        self.reg(0x34).get("enable_input") != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_reads_back_the_fixed_constant() {
        let mut map = SdrRegisterMap::new(1, 2);
        let (data, _) = map.host_read(0x00);
        assert_eq!(data, PRODUCT_ID);
    }

    #[test]
    fn version_carries_the_configured_platform_byte() {
        let map = SdrRegisterMap::new(7, 2);
        assert_eq!(map.reg(0x04).get("platform"), 7);
    }

    #[test]
    fn recorder_start_pulse_is_visible_once_then_clears() {
        let mut map = SdrRegisterMap::new(0, 2);
        map.host_write(0x10, 1, 0b1111);
        assert!(map.take_recorder_start_pulse());
        assert!(!map.take_recorder_start_pulse());
    }

    #[test]
    fn ddc_coeff_wdata_sign_extends_from_eighteen_bits() {
        let mut map = SdrRegisterMap::new(0, 2);
        map.host_write(0x28, (-1i32 as u32) << 1, 0b1111);
        assert_eq!(map.ddc_coeff_wdata(), -1);
    }

    #[test]
    fn writing_read_only_product_id_is_ignored() {
        let mut map = SdrRegisterMap::new(0, 2);
        map.host_write(0x00, 0, 0b1111);
        let (data, _) = map.host_read(0x00);
        assert_eq!(data, PRODUCT_ID);
    }
}
