//! Flip-flop module generation.
//!
//! All four kinds share one storage-block template per dialect; only the
//! module name, data ports and the `{{nextState}}` expression differ. An
//! edge trigger emits a flip-flop form, a level trigger a transparent-latch
//! form; clear and preset take priority over the data path in both.

use crate::func::{FlipFlop, FlipFlopKind};
use crate::hdl::{Dialect, GenerationError, HdlBuffer, HdlGenerator, Module, Width};

impl FlipFlopKind {
    fn module_name(self) -> &'static str {
        match self {
            FlipFlopKind::D => "dFlipFlop",
            FlipFlopKind::T => "tFlipFlop",
            FlipFlopKind::Sr => "srFlipFlop",
            FlipFlopKind::Jk => "jkFlipFlop",
        }
    }

    fn port_names(self) -> &'static [&'static str] {
        match self {
            FlipFlopKind::D => &["d"],
            FlipFlopKind::T => &["t"],
            FlipFlopKind::Sr => &["s", "r"],
            FlipFlopKind::Jk => &["j", "k"],
        }
    }

    /// The next-state expression over the data ports and `s_currentState`.
    fn next_state(self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (FlipFlopKind::D, Dialect::Vhdl) => "d",
            (FlipFlopKind::T, Dialect::Vhdl) => "t xor s_currentState",
            (FlipFlopKind::Sr, Dialect::Vhdl) => "s or (not(r) and s_currentState)",
            (FlipFlopKind::Jk, Dialect::Vhdl) => {
                "(j and not(s_currentState)) or (not(k) and s_currentState)"
            }
            (FlipFlopKind::D, Dialect::Verilog) => "d",
            (FlipFlopKind::T, Dialect::Verilog) => "t ^ s_currentState",
            (FlipFlopKind::Sr, Dialect::Verilog) => "s | (~r & s_currentState)",
            (FlipFlopKind::Jk, Dialect::Verilog) => {
                "(j & ~s_currentState) | (~k & s_currentState)"
            }
        }
    }
}

impl HdlGenerator for FlipFlop {
    fn declaration(&self) -> Module {
        let mut module = Module::new(self.kind.module_name())
            .param("invertClock", self.trigger.clock_polarity());
        for &name in self.kind.port_names() {
            module = module.input(name, Width::Fixed(1));
        }
        module
            .input("clock", Width::Fixed(1))
            .input("preset", Width::Fixed(1))
            .input("clear", Width::Fixed(1))
            .output("q", Width::Fixed(1))
            .output("qBar", Width::Fixed(1))
            .wire("s_clock", Width::Fixed(1))
            .wire("s_nextState", Width::Fixed(1))
            .reg("s_currentState", Width::Fixed(1))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        let buf = HdlBuffer::new().pair("nextState", self.kind.next_state(dialect));
        Ok(match dialect {
            Dialect::Vhdl => {
                let edge = if self.trigger.is_edge() {
                    "rising_edge(s_clock)"
                } else {
                    "s_clock = '1'"
                };
                buf.pair("edge", edge).add(
"q    <= s_currentState;
qBar <= not(s_currentState);

s_clock     <= clock when invertClock = 0 else not(clock);
s_nextState <= {{nextState}};

makeState : process(s_clock, preset, clear, s_nextState) is
begin
   if (clear = '1') then s_currentState <= '0';
   elsif (preset = '1') then s_currentState <= '1';
   elsif ({{edge}}) then
      s_currentState <= s_nextState;
   end if;
end process makeState;")
            }
            Dialect::Verilog => {
                let (sensitivity, update) = if self.trigger.is_edge() {
                    (
                        "always @(posedge s_clock or posedge clear or posedge preset)",
                        "else s_currentState <= s_nextState;",
                    )
                } else {
                    ("always @(*)", "else if (s_clock) s_currentState <= s_nextState;")
                };
                buf.pair("sensitivity", sensitivity).pair("update", update).add(
"assign q    = s_currentState;
assign qBar = ~s_currentState;

assign s_clock     = (invertClock == 0) ? clock : ~clock;
assign s_nextState = {{nextState}};

{{sensitivity}}
begin
   if (clear) s_currentState <= 1'b0;
   else if (preset) s_currentState <= 1'b1;
   {{update}}
end")
            }
        })
    }
}
