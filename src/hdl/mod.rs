//! Dual-dialect HDL synthesis for the sequential primitives.
//!
//! Every primitive configuration can render itself into a self-contained
//! HDL module in either supported [`Dialect`]. Generation is a pure query
//! over the immutable configuration: it returns `Result`, never panics, and
//! a failed combination (e.g. a dialect with no mapping for a primitive)
//! reports [`GenerationError::UnsupportedTarget`] instead of emitting
//! partial text.
//!
//! ## This module notably consists of:
//! - **[`HdlBuffer`]**: deferred `{{token}}` substitution over output lines.
//! - **[`Module`]**: dialect-independent parameter/port/signal declarations.
//! - **[`HdlGenerator`]**: the per-primitive generation interface.
//! - **[`generate`]**: the dispatch entry point over [`SequentialFn`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::func::SequentialFn;

pub use decl::{Module, Param, Port, PortDir, Width};
pub use rom::RomContents;
pub use template::HdlBuffer;

mod counter;
mod decl;
mod flipflop;
mod random;
mod register;
mod rom;
mod template;

/// A textual hardware-description output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// VHDL-93 style output.
    Vhdl,
    /// Verilog-2001 style output.
    Verilog,
}
impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dialect::Vhdl => "VHDL",
            Dialect::Verilog => "Verilog",
        })
    }
}

/// Ways a generation query can fail.
///
/// These are returned, not raised, so batch generation over many primitives
/// can continue past one failure and report them all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A `{{token}}` had no entry in the pairing table at render time.
    #[error("unresolved placeholder `{0}`")]
    UnresolvedPlaceholder(String),
    /// The (dialect, primitive) combination has no defined mapping.
    #[error("no {dialect} mapping for {component}")]
    UnsupportedTarget {
        /// The primitive being generated.
        component: &'static str,
        /// The requested output dialect.
        dialect: Dialect,
    },
    /// The configuration cannot be expressed in hardware as requested.
    #[error("cannot generate {component}: {reason}")]
    InvalidConfiguration {
        /// The primitive being generated.
        component: &'static str,
        /// Why the configuration is rejected.
        reason: String,
    },
}

/// The interface each primitive's generator implements.
pub trait HdlGenerator {
    /// The dialect-independent module declaration: name, parameters, ports
    /// and internal signals.
    fn declaration(&self) -> Module;

    /// The dialect-specific update-logic fragment.
    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError>;

    /// Renders the complete module.
    fn generate(&self, dialect: Dialect) -> Result<String, GenerationError> {
        self.declaration().render(dialect, &self.body(dialect)?)
    }
}

/// Renders the HDL module for any registered primitive configuration.
pub fn generate(func: &SequentialFn, dialect: Dialect) -> Result<String, GenerationError> {
    match func {
        SequentialFn::FlipFlop(f) => f.generate(dialect),
        SequentialFn::Register(f) => f.generate(dialect),
        SequentialFn::ShiftRegister(f) => f.generate(dialect),
        SequentialFn::Counter(f) => f.generate(dialect),
        SequentialFn::Random(f) => f.generate(dialect),
        SequentialFn::TinyMtRng(f) => f.generate(dialect),
    }
}

/// Formats a value as a sized binary literal for the given dialect.
fn bit_literal(dialect: Dialect, value: u64, width: u8) -> String {
    let bits: String = (0..width)
        .rev()
        .map(|i| if (value >> i) & 1 != 0 { '1' } else { '0' })
        .collect();
    match dialect {
        Dialect::Vhdl if width == 1 => format!("'{bits}'"),
        Dialect::Vhdl => format!("\"{bits}\""),
        Dialect::Verilog => format!("{width}'b{bits}"),
    }
}

#[cfg(test)]
mod test {
    use super::{bit_literal, generate, Dialect, GenerationError};
    use crate::func::{Counter, FlipFlop, FlipFlopKind, Random, Register, SequentialFn,
                      ShiftRegister, TinyMtRng};

    #[test]
    fn every_primitive_generates_vhdl() {
        let funcs: [SequentialFn; 6] = [
            FlipFlop::new(FlipFlopKind::D).into(),
            Register::new(8).into(),
            ShiftRegister::new(4, 3).into(),
            Counter::new(8).into(),
            Random::new(16, 1).into(),
            TinyMtRng::new(16, 1).into(),
        ];
        for func in &funcs {
            let text = generate(func, Dialect::Vhdl).unwrap();
            assert!(text.contains("entity"), "{func:?}");
            assert!(text.contains("architecture"), "{func:?}");
        }
    }

    #[test]
    fn verilog_covers_all_but_tinymt() {
        let funcs: [SequentialFn; 5] = [
            FlipFlop::new(FlipFlopKind::Jk).into(),
            Register::new(8).into(),
            ShiftRegister::new(4, 3).into(),
            Counter::new(8).into(),
            Random::new(16, 1).into(),
        ];
        for func in &funcs {
            let text = generate(func, Dialect::Verilog).unwrap();
            assert!(text.starts_with("module"), "{func:?}");
            assert!(text.trim_end().ends_with("endmodule"), "{func:?}");
        }

        let tinymt: SequentialFn = TinyMtRng::new(16, 1).into();
        assert_eq!(
            generate(&tinymt, Dialect::Verilog),
            Err(GenerationError::UnsupportedTarget {
                component: "tinyMtRng",
                dialect: Dialect::Verilog,
            })
        );
    }

    #[test]
    fn bit_literals() {
        assert_eq!(bit_literal(Dialect::Vhdl, 5, 4), "\"0101\"");
        assert_eq!(bit_literal(Dialect::Vhdl, 1, 1), "'1'");
        assert_eq!(bit_literal(Dialect::Verilog, 5, 4), "4'b0101");
    }
}
