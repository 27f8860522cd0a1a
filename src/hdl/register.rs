//! Register and shift-register module generation.

use crate::func::{Register, ShiftRegister};
use crate::hdl::{Dialect, GenerationError, HdlBuffer, HdlGenerator, Module, Width};

impl HdlGenerator for Register {
    fn declaration(&self) -> Module {
        Module::new("dataRegister")
            .param("width", u64::from(self.bitsize()))
            .param("invertClock", self.trigger.clock_polarity())
            .input("clock", Width::Fixed(1))
            .input("reset", Width::Fixed(1))
            .input("enable", Width::Fixed(1))
            .input("d", Width::Param("width"))
            .output("q", Width::Param("width"))
            .wire("s_clock", Width::Fixed(1))
            .reg("s_currentState", Width::Param("width"))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        Ok(match dialect {
            Dialect::Vhdl => {
                let edge = if self.trigger.is_edge() {
                    "rising_edge(s_clock)"
                } else {
                    "s_clock = '1'"
                };
                HdlBuffer::new().pair("edge", edge).add(
"q       <= s_currentState;
s_clock <= clock when invertClock = 0 else not(clock);

makeState : process(s_clock, reset, enable, d) is
begin
   if (reset = '1') then s_currentState <= (others => '0');
   elsif ({{edge}}) then
      if (enable = '1') then s_currentState <= d;
      end if;
   end if;
end process makeState;")
            }
            Dialect::Verilog => {
                let (sensitivity, gate) = if self.trigger.is_edge() {
                    ("always @(posedge s_clock or posedge reset)", "enable")
                } else {
                    ("always @(*)", "s_clock & enable")
                };
                HdlBuffer::new().pair("sensitivity", sensitivity).pair("gate", gate).add(
"assign q       = s_currentState;
assign s_clock = (invertClock == 0) ? clock : ~clock;

{{sensitivity}}
begin
   if (reset) s_currentState <= 0;
   else if ({{gate}}) s_currentState <= d;
end")
            }
        })
    }
}

impl ShiftRegister {
    /// Width of the flattened parallel-load bus: stage `i` occupies bits
    /// `(i+1)*width-1 .. i*width`, stage `0` being where serial data enters.
    fn bus_width(&self) -> u16 {
        u16::from(self.bitsize()) * u16::from(self.length())
    }
}
impl HdlGenerator for ShiftRegister {
    fn declaration(&self) -> Module {
        Module::new("shiftRegister")
            .param("width", u64::from(self.bitsize()))
            .param("stages", u64::from(self.length()))
            .param("invertClock", self.trigger.clock_polarity())
            .input("clock", Width::Fixed(1))
            .input("reset", Width::Fixed(1))
            .input("shiftEnable", Width::Fixed(1))
            .input("parLoad", Width::Fixed(1))
            .input("shiftIn", Width::Fixed(u16::from(self.bitsize())))
            .input("d", Width::Fixed(self.bus_width()))
            .output("shiftOut", Width::Fixed(u16::from(self.bitsize())))
            .output("q", Width::Fixed(self.bus_width()))
            .wire("s_clock", Width::Fixed(1))
            .wire("s_stateNext", Width::Fixed(self.bus_width()))
            .reg("s_stateReg", Width::Fixed(self.bus_width()))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        if !self.trigger.is_edge() {
            return Err(GenerationError::InvalidConfiguration {
                component: "shiftRegister",
                reason: format!("level trigger {:?} has no latch form", self.trigger),
            });
        }

        let width = u16::from(self.bitsize());
        let top = self.bus_width() - 1;
        let out_low = self.bus_width() - width;
        Ok(match dialect {
            Dialect::Vhdl => {
                // The end of the chain is the top stage; shifting moves every
                // stage up one slot and inserts shiftIn at the bottom.
                let shifted = match self.length() {
                    1 => "shiftIn".to_string(),
                    _ => format!("s_stateReg({} downto 0) & shiftIn", out_low - 1),
                };
                // A one-bit shiftOut is a scalar, not a 1-wide slice.
                let out_slice = match width {
                    1 => format!("s_stateReg({top})"),
                    _ => format!("s_stateReg({top} downto {out_low})"),
                };
                HdlBuffer::new()
                    .pair("shifted", shifted)
                    .pair("outSlice", out_slice)
                    .add(
"q        <= s_stateReg;
shiftOut <= {{outSlice}};
s_clock  <= clock when invertClock = 0 else not(clock);

s_stateNext <= d when parLoad = '1' else {{shifted}};

makeState : process(s_clock, reset, shiftEnable, parLoad, s_stateNext) is
begin
   if (reset = '1') then s_stateReg <= (others => '0');
   elsif (rising_edge(s_clock)) then
      if ((shiftEnable = '1') or (parLoad = '1')) then
         s_stateReg <= s_stateNext;
      end if;
   end if;
end process makeState;")
            }
            Dialect::Verilog => {
                let shifted = match self.length() {
                    1 => "shiftIn".to_string(),
                    _ => format!("{{s_stateReg[{}:0],shiftIn}}", out_low - 1),
                };
                HdlBuffer::new()
                    .pair("top", top)
                    .pair("outLow", out_low)
                    .add(
"assign q        = s_stateReg;
assign shiftOut = s_stateReg[{{top}}:{{outLow}}];
assign s_clock  = (invertClock == 0) ? clock : ~clock;")
                    .add(&format!("assign s_stateNext = (parLoad) ? d : {shifted};"))
                    .add(
"
always @(posedge s_clock or posedge reset)
begin
   if (reset) s_stateReg <= 0;
   else if (shiftEnable|parLoad) s_stateReg <= s_stateNext;
end")
            }
        })
    }
}
