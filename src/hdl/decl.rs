//! Dialect-independent module declarations.
//!
//! A [`Module`] records what a generated HDL module declares (parameters,
//! ports, internal wires and registers) without committing to a dialect;
//! [`Module::render`] turns the declaration plus a dialect-specific body
//! into the final text. Ports keep a stable declaration order so generated
//! modules diff cleanly across runs.

use crate::hdl::{Dialect, GenerationError, HdlBuffer};

/// The direction of a declared port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDir {
    /// Signal into the module.
    Input,
    /// Signal out of the module.
    Output,
}

/// The width of a declared signal: either a fixed bit count or a reference
/// to one of the module's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// A concrete width in bits; `1` declares a scalar.
    Fixed(u16),
    /// A width equal to the named parameter's value.
    Param(&'static str),
}
impl Width {
    fn vhdl_type(self) -> String {
        match self {
            Width::Fixed(1) => "std_logic".to_string(),
            Width::Fixed(n) => format!("std_logic_vector({} downto 0)", n - 1),
            Width::Param(p) => format!("std_logic_vector(({p} - 1) downto 0)"),
        }
    }
    fn verilog_range(self) -> String {
        match self {
            Width::Fixed(1) => String::new(),
            Width::Fixed(n) => format!("[{}:0] ", n - 1),
            Width::Param(p) => format!("[{p}-1:0] "),
        }
    }
}

/// A named integer parameter and its configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The parameter name referenced by the body and port widths.
    pub name: &'static str,
    /// The configured value.
    pub value: u64,
}

/// A declared port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The port direction.
    pub dir: PortDir,
    /// The port width.
    pub width: Width,
}

/// The declaration side of one generated module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    name: &'static str,
    params: Vec<Param>,
    ports: Vec<Port>,
    wires: Vec<(String, Width)>,
    regs: Vec<(String, Width)>,
}
impl Module {
    /// Creates an empty declaration for the named module.
    pub fn new(name: &'static str) -> Self {
        Self { name, ..Default::default() }
    }

    /// The module name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declares an integer parameter.
    pub fn param(mut self, name: &'static str, value: u64) -> Self {
        self.params.push(Param { name, value });
        self
    }
    /// Declares an input port.
    pub fn input(mut self, name: impl Into<String>, width: Width) -> Self {
        self.ports.push(Port { name: name.into(), dir: PortDir::Input, width });
        self
    }
    /// Declares an output port.
    pub fn output(mut self, name: impl Into<String>, width: Width) -> Self {
        self.ports.push(Port { name: name.into(), dir: PortDir::Output, width });
        self
    }
    /// Declares an internal combinational signal.
    pub fn wire(mut self, name: impl Into<String>, width: Width) -> Self {
        self.wires.push((name.into(), width));
        self
    }
    /// Declares an internal clocked signal.
    pub fn reg(mut self, name: impl Into<String>, width: Width) -> Self {
        self.regs.push((name.into(), width));
        self
    }

    /// Renders the full module around the given body fragment.
    pub fn render(&self, dialect: Dialect, body: &HdlBuffer) -> Result<String, GenerationError> {
        let body = body.render()?;
        Ok(match dialect {
            Dialect::Vhdl => self.render_vhdl(&body),
            Dialect::Verilog => self.render_verilog(&body),
        })
    }

    fn render_vhdl(&self, body: &str) -> String {
        let mut out = String::new();
        out.push_str("library ieee;\n");
        out.push_str("use ieee.std_logic_1164.all;\n");
        out.push_str("use ieee.numeric_std.all;\n\n");

        out.push_str(&format!("entity {} is\n", self.name));
        if !self.params.is_empty() {
            let generics: Vec<_> = self.params.iter()
                .map(|p| format!("{} : integer := {}", p.name, p.value))
                .collect();
            out.push_str(&format!("   generic ( {} );\n", generics.join(";\n             ")));
        }
        let ports: Vec<_> = self.ports.iter()
            .map(|p| {
                let dir = match p.dir {
                    PortDir::Input => "in",
                    PortDir::Output => "out",
                };
                format!("{} : {} {}", p.name, dir, p.width.vhdl_type())
            })
            .collect();
        out.push_str(&format!("   port ( {} );\n", ports.join(";\n          ")));
        out.push_str(&format!("end entity {};\n\n", self.name));

        out.push_str(&format!("architecture behavior of {} is\n", self.name));
        for (name, width) in self.wires.iter().chain(&self.regs) {
            out.push_str(&format!("   signal {name} : {};\n", width.vhdl_type()));
        }
        out.push_str("begin\n");
        for line in body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("   {line}\n"));
            }
        }
        out.push_str("end architecture behavior;\n");
        out
    }

    fn render_verilog(&self, body: &str) -> String {
        let mut out = String::new();
        let names: Vec<_> = self.ports.iter().map(|p| p.name.as_str()).collect();
        out.push_str(&format!("module {}( {} );\n\n", self.name, names.join(",\n        ")));

        for p in &self.params {
            out.push_str(&format!("   parameter {} = {};\n", p.name, p.value));
        }
        if !self.params.is_empty() {
            out.push('\n');
        }
        for p in &self.ports {
            let dir = match p.dir {
                PortDir::Input => "input",
                PortDir::Output => "output",
            };
            out.push_str(&format!("   {dir} {}{};\n", p.width.verilog_range(), p.name));
        }
        out.push('\n');
        for (name, width) in &self.wires {
            out.push_str(&format!("   wire {}{name};\n", width.verilog_range()));
        }
        for (name, width) in &self.regs {
            out.push_str(&format!("   reg {}{name};\n", width.verilog_range()));
        }
        out.push('\n');
        for line in body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("   {line}\n"));
            }
        }
        out.push_str("\nendmodule\n");
        out
    }
}

#[cfg(test)]
mod test {
    use super::{Module, Width};
    use crate::hdl::{Dialect, HdlBuffer};

    fn sample() -> Module {
        Module::new("sample")
            .param("width", 8)
            .input("clock", Width::Fixed(1))
            .input("d", Width::Param("width"))
            .output("q", Width::Param("width"))
            .wire("s_clock", Width::Fixed(1))
            .reg("s_state", Width::Param("width"))
    }

    #[test]
    fn vhdl_scaffold() {
        let text = sample()
            .render(Dialect::Vhdl, &HdlBuffer::new().add("q <= s_state;"))
            .unwrap();
        assert!(text.contains("entity sample is"));
        assert!(text.contains("generic ( width : integer := 8 );"));
        assert!(text.contains("d : in std_logic_vector((width - 1) downto 0)"));
        assert!(text.contains("signal s_state : std_logic_vector((width - 1) downto 0);"));
        assert!(text.contains("   q <= s_state;"));
        assert!(text.trim_end().ends_with("end architecture behavior;"));
    }

    #[test]
    fn verilog_scaffold() {
        let text = sample()
            .render(Dialect::Verilog, &HdlBuffer::new().add("assign q = s_state;"))
            .unwrap();
        assert!(text.starts_with("module sample( clock,"));
        assert!(text.contains("parameter width = 8;"));
        assert!(text.contains("input [width-1:0] d;"));
        assert!(text.contains("reg [width-1:0] s_state;"));
        assert!(text.contains("   assign q = s_state;"));
        assert!(text.trim_end().ends_with("endmodule"));
    }

    #[test]
    fn body_errors_propagate() {
        let result = sample().render(Dialect::Vhdl, &HdlBuffer::new().add("{{nope}}"));
        assert!(result.is_err());
    }
}
