//! Single register: a bit-field layout with per-field access class.

/// How a field's bits behave under host read/write traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// Read-only; writes are silently discarded.
    R,
    /// Read-write; the host's last write is the value read back.
    Rw,
    /// Write-only; reads always observe zero.
    W,
    /// Writing asserts the field for exactly one cycle; it self-clears the
    /// cycle after (`Register::tick`).
    Wpulse,
    /// Hardware latches a sticky condition (`Register::assert_sticky`); a
    /// host read clears the bit if the driving condition is currently low
    /// (`Register::set_sticky_input`), and the bit drives the register's
    /// interrupt line while any sticky field is non-zero.
    Rsticky,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub offset: u32,
    pub width: u32,
    pub access: AccessClass,
}

impl Field {
    fn mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            ((1u32 << self.width) - 1) << self.offset
        }
    }
}

/// One memory-mapped register: a fixed field layout plus the live value
/// each field holds, tracked independently of byte write-strobes.
#[derive(Debug, Clone)]
pub struct Register {
    pub name: &'static str,
    fields: Vec<Field>,
    value: u32,
    reset_value: u32,
    sticky_inputs: u32,
}

impl Register {
    pub fn new(name: &'static str, fields: Vec<Field>, reset_value: u32) -> Self {
        Register {
            name,
            fields,
            value: reset_value,
            reset_value,
            sticky_inputs: 0,
        }
    }

    pub fn reset(&mut self) {
        self.value = self.reset_value;
        self.sticky_inputs = 0;
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Host write with byte write-strobes (bit `i` selects byte `i` of the
    /// 32-bit word). `R` fields are masked out of the update; `Wpulse`
    /// fields are asserted (cleared automatically on the next `tick`).
    pub fn host_write(&mut self, data: u32, byte_strobes: u8) {
        let mut byte_mask = 0u32;
        for byte in 0..4u32 {
            if byte_strobes & (1 << byte) != 0 {
                byte_mask |= 0xff << (byte * 8);
            }
        }
        let mut writable_mask = 0u32;
        for f in &self.fields {
            if !matches!(f.access, AccessClass::R) {
                writable_mask |= f.mask();
            }
        }
        let mask = byte_mask & writable_mask;
        self.value = (self.value & !mask) | (data & mask);
    }

    /// Host read. `Rsticky` fields whose driving input is currently low
    /// clear on this read; the returned word always masks `W`/`Wpulse`
    /// fields to zero (a pulse is internal plumbing, not host-visible).
    pub fn host_read(&mut self) -> u32 {
        let visible = self.value;
        let mut hide_mask = 0u32;
        for f in &self.fields {
            match f.access {
                AccessClass::W | AccessClass::Wpulse => hide_mask |= f.mask(),
                AccessClass::Rsticky => {
                    let bit = 1u32 << f.offset;
                    if self.sticky_inputs & bit == 0 {
                        self.value &= !f.mask();
                    }
                }
                _ => {}
            }
        }
        visible & !hide_mask
    }

    /// Advance one cycle: clears any asserted `Wpulse` field.
    pub fn tick(&mut self) {
        for f in &self.fields {
            if f.access == AccessClass::Wpulse {
                self.value &= !f.mask();
            }
        }
    }

    /// Read a field's current raw (unshifted) value.
    pub fn get(&self, name: &str) -> u32 {
        let f = self.field(name).expect("unknown field");
        (self.value & f.mask()) >> f.offset
    }

    pub fn set(&mut self, name: &str, value: u32) {
        let f = self.field(name).expect("unknown field").clone();
        self.value = (self.value & !f.mask()) | ((value << f.offset) & f.mask());
    }

    /// Take (read-and-clear) a `Wpulse` field's assertion.
    pub fn take_pulse(&mut self, name: &str) -> bool {
        let bit = self.get(name) != 0;
        if bit {
            self.set(name, 0);
        }
        bit
    }

    /// Hardware side: drive a sticky condition high for this cycle, OR-ing
    /// it into the latch.
    pub fn assert_sticky(&mut self, name: &str) {
        let f = self.field(name).expect("unknown field").clone();
        self.sticky_inputs |= 1 << f.offset;
        self.value |= f.mask();
    }

    /// Hardware side: the sticky condition has gone low this cycle.
    pub fn deassert_sticky(&mut self, name: &str) {
        let f = self.field(name).expect("unknown field");
        self.sticky_inputs &= !(1u32 << f.offset);
    }

    /// `true` while any `Rsticky` field is non-zero.
    pub fn interrupt(&self) -> bool {
        self.fields
            .iter()
            .filter(|f| f.access == AccessClass::Rsticky)
            .any(|f| self.value & f.mask() != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wpulse_reg() -> Register {
        Register::new(
            "r",
            vec![Field {
                name: "go",
                offset: 0,
                width: 1,
                access: AccessClass::Wpulse,
            }],
            0,
        )
    }

    #[test]
    fn wpulse_field_clears_after_one_tick() {
        let mut r = wpulse_reg();
        r.host_write(1, 0b1111);
        assert_eq!(r.get("go"), 1);
        r.tick();
        assert_eq!(r.get("go"), 0);
    }

    #[test]
    fn rsticky_clears_only_when_read_while_input_low() {
        let mut r = Register::new(
            "irq",
            vec![Field {
                name: "flag",
                offset: 0,
                width: 1,
                access: AccessClass::Rsticky,
            }],
            0,
        );
        r.assert_sticky("flag");
        assert!(r.interrupt());
        // input still high: reading does not clear it.
        r.deassert_sticky("flag"); // but not yet
        r.assert_sticky("flag");
        r.host_read();
        assert!(r.interrupt());
        // now input goes low, then read clears.
        r.deassert_sticky("flag");
        r.host_read();
        assert!(!r.interrupt());
    }

    #[test]
    fn write_only_byte_strobe_masks_untouched_bytes() {
        let mut r = Register::new(
            "w",
            vec![Field {
                name: "all",
                offset: 0,
                width: 32,
                access: AccessClass::Rw,
            }],
            0,
        );
        r.host_write(0xaabb_ccdd, 0b0011); // only low two bytes
        assert_eq!(r.get("all"), 0x0000_ccdd);
    }
}
