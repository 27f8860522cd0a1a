//! Read-only memory lookup-table generation.
//!
//! A ROM has no clocked storage: the generated module is one combinational
//! lookup over the address (a VHDL case, a Verilog conditional assign), with
//! an arm per non-zero cell and every unlisted address reading zero.

use std::collections::BTreeMap;

use crate::bitarray::BitArray;
use crate::hdl::{bit_literal, Dialect, GenerationError, HdlBuffer, HdlGenerator, Module, Width};

/// A sparse read-only memory image.
///
/// Only non-zero cells are stored; every other address reads as zero.
/// Addresses are iterated in ascending order, so generated output is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomContents {
    addr_width: u8,
    data_width: u8,
    cells: BTreeMap<u64, u64>,
}
impl RomContents {
    /// The largest supported address width.
    pub const MAX_ADDR_WIDTH: u8 = 20;

    /// Creates an all-zero memory image.
    pub fn new(addr_width: u8, data_width: u8) -> Self {
        Self {
            addr_width: addr_width.clamp(1, Self::MAX_ADDR_WIDTH),
            data_width: data_width.clamp(BitArray::MIN_BITSIZE, BitArray::MAX_BITSIZE),
            cells: BTreeMap::new(),
        }
    }

    /// The address width in bits.
    pub fn addr_width(&self) -> u8 {
        self.addr_width
    }
    /// The data width in bits.
    pub fn data_width(&self) -> u8 {
        self.data_width
    }

    /// Writes one cell, masking the value to the data width. Writing zero
    /// removes the cell. Out-of-range addresses are ignored.
    pub fn set(&mut self, addr: u64, value: u64) {
        if addr >= 1 << self.addr_width {
            return;
        }
        let mask = match self.data_width {
            64.. => u64::MAX,
            w => (1 << w) - 1,
        };
        let value = value & mask;
        match value {
            0 => {
                self.cells.remove(&addr);
            }
            v => {
                self.cells.insert(addr, v);
            }
        }
    }

    /// Reads one cell; unlisted addresses read as zero.
    pub fn get(&self, addr: u64) -> u64 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    /// The number of non-zero cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    /// Iterates over the non-zero cells in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.cells.iter().map(|(&a, &v)| (a, v))
    }
}

impl HdlGenerator for RomContents {
    fn declaration(&self) -> Module {
        Module::new("rom")
            .input("address", Width::Fixed(u16::from(self.addr_width)))
            .output("data", Width::Fixed(u16::from(self.data_width)))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        let mut buf = HdlBuffer::new();
        match dialect {
            Dialect::Vhdl => {
                buf = buf.add("makeRom : process(address) is\nbegin\n   case (address) is");
                for (addr, value) in self.iter() {
                    buf = buf.add(&format!(
                        "      when {} => data <= {};",
                        bit_literal(dialect, addr, self.addr_width),
                        bit_literal(dialect, value, self.data_width),
                    ));
                }
                buf = buf.add(
"      when others => data <= (others => '0');
   end case;
end process makeRom;");
            }
            Dialect::Verilog => {
                // The output is a net, so the table is one chained
                // conditional assign rather than a procedural case.
                let mut expr = String::from("assign data = ");
                for (addr, value) in self.iter() {
                    expr.push_str(&format!(
                        "(address == {}) ? {} :\n              ",
                        bit_literal(dialect, addr, self.addr_width),
                        bit_literal(dialect, value, self.data_width),
                    ));
                }
                expr.push_str("0;");
                buf = buf.add(&expr);
            }
        }
        Ok(buf)
    }
}
