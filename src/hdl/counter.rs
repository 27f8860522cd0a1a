//! Counter module generation.
//!
//! The emitted module splits into a carry comparator, a next-value
//! computation honoring the goal policy, and the clocked storage block with
//! asynchronous clear. The `mode` parameter carries the goal policy as an
//! integer so the same body works for every policy.

use crate::func::{Counter, GoalBehavior};
use crate::hdl::{Dialect, GenerationError, HdlBuffer, HdlGenerator, Module, Width};

/// The integer code the `mode` parameter carries for each goal policy.
fn mode_code(on_goal: GoalBehavior) -> u64 {
    match on_goal {
        GoalBehavior::Wrap => 0,
        GoalBehavior::Stay => 1,
        GoalBehavior::Continue => 2,
        GoalBehavior::LoadNext => 3,
    }
}

impl HdlGenerator for Counter {
    fn declaration(&self) -> Module {
        Module::new("counter")
            .param("width", u64::from(self.bitsize()))
            .param("maxVal", self.max())
            .param("invertClock", self.trigger.clock_polarity())
            .param("mode", mode_code(self.on_goal))
            .input("clock", Width::Fixed(1))
            .input("loadData", Width::Param("width"))
            .input("clear", Width::Fixed(1))
            .input("load", Width::Fixed(1))
            .input("upNotDown", Width::Fixed(1))
            .input("enable", Width::Fixed(1))
            .output("countValue", Width::Param("width"))
            .output("compareOut", Width::Fixed(1))
            .wire("s_clock", Width::Fixed(1))
            .wire("s_realEnable", Width::Fixed(1))
            .wire("s_carry", Width::Fixed(1))
            .wire("s_nextCounterValue", Width::Param("width"))
            .reg("s_counterValue", Width::Param("width"))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        if !self.trigger.is_edge() {
            return Err(GenerationError::InvalidConfiguration {
                component: "counter",
                reason: format!("level trigger {:?} has no latch form", self.trigger),
            });
        }
        // The maximum rides in an integer parameter, which both dialects
        // treat as a 32-bit signed value.
        if self.max() > i32::MAX as u64 {
            return Err(GenerationError::InvalidConfiguration {
                component: "counter",
                reason: format!("maximum {} does not fit an integer parameter", self.max()),
            });
        }
        Ok(match dialect {
            Dialect::Vhdl => HdlBuffer::new().add(
"compareOut <= s_carry;
countValue <= s_counterValue;
s_clock    <= clock when invertClock = 0 else not(clock);

makeCarry : process(upNotDown, s_counterValue) is
begin
   if (upNotDown = '0') then
      if (s_counterValue = std_logic_vector(to_unsigned(0, width))) then
         s_carry <= '1';
      else
         s_carry <= '0';
      end if;
   else
      if (s_counterValue = std_logic_vector(to_unsigned(maxVal, width))) then
         s_carry <= '1';
      else
         s_carry <= '0';
      end if;
   end if;
end process makeCarry;

s_realEnable <= '0' when (load = '0' and enable = '0')
                      or (mode = 1 and s_carry = '1' and load = '0')
                else '1';

makeNextValue : process(load, upNotDown, s_counterValue, loadData, s_carry) is
begin
   if ((load = '1') or (mode = 3 and s_carry = '1')) then
      s_nextCounterValue <= loadData;
   elsif (mode = 0 and s_carry = '1') then
      if (upNotDown = '1') then
         s_nextCounterValue <= (others => '0');
      else
         s_nextCounterValue <= std_logic_vector(to_unsigned(maxVal, width));
      end if;
   elsif (upNotDown = '1') then
      s_nextCounterValue <= std_logic_vector(unsigned(s_counterValue) + 1);
   else
      s_nextCounterValue <= std_logic_vector(unsigned(s_counterValue) - 1);
   end if;
end process makeNextValue;

makeFlops : process(s_clock, s_realEnable, clear, s_nextCounterValue) is
begin
   if (clear = '1') then s_counterValue <= (others => '0');
   elsif (rising_edge(s_clock)) then
      if (s_realEnable = '1') then s_counterValue <= s_nextCounterValue;
      end if;
   end if;
end process makeFlops;"),
            Dialect::Verilog => HdlBuffer::new().add(
"assign compareOut = s_carry;
assign countValue = s_counterValue;
assign s_clock    = (invertClock == 0) ? clock : ~clock;

assign s_carry = (upNotDown)
                    ? (s_counterValue == maxVal) ? 1'b1 : 1'b0
                    : (s_counterValue == 0) ? 1'b1 : 1'b0;

assign s_realEnable = ((~(load)&~(enable))|
                       ((mode == 1)&s_carry&~(load))) ? 1'b0 : 1'b1;

assign s_nextCounterValue =
   ((load)|((mode == 3)&s_carry)) ? loadData :
   ((mode == 0)&s_carry&upNotDown) ? 0 :
   ((mode == 0)&s_carry) ? maxVal :
   (upNotDown) ? s_counterValue + 1 : s_counterValue - 1;

always @(posedge s_clock or posedge clear)
begin
   if (clear) s_counterValue <= 0;
   else if (s_realEnable) s_counterValue <= s_nextCounterValue;
end"),
        })
    }
}
