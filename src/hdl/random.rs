//! Pseudo-random generator module generation.
//!
//! The LCG module keeps the full 48-bit seed in a register and applies the
//! multiply-accumulate step in a single cycle; the output taps bits 12 and
//! up of the seed, matching the simulation. The xorshift-add generator only
//! has a VHDL mapping; its reset state is precomputed from the configured
//! seed at generation time, so the emitted module needs no initialization
//! network.

use crate::func::{Random, TinyMtRng};
use crate::hdl::{Dialect, GenerationError, HdlBuffer, HdlGenerator, Module, Width};
use crate::state::TinyMtState;

impl Random {
    /// The 48-bit seed the hardware resets to; seed `0` falls back to the
    /// multiplier constant, since the wall clock is unavailable in hardware.
    fn hdl_init_seed(&self) -> u64 {
        match self.seed {
            0 => 0x5DEECE66D,
            s => u64::from(s),
        }
    }
}

impl HdlGenerator for Random {
    fn declaration(&self) -> Module {
        Module::new("random")
            .param("width", u64::from(self.bitsize()))
            .param("invertClock", self.trigger.clock_polarity())
            .input("clock", Width::Fixed(1))
            .input("clear", Width::Fixed(1))
            .input("enable", Width::Fixed(1))
            .output("q", Width::Param("width"))
            .wire("s_clock", Width::Fixed(1))
            .wire("s_initSeed", Width::Fixed(48))
            .reg("s_currentSeed", Width::Fixed(48))
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        if !self.trigger.is_edge() {
            return Err(GenerationError::InvalidConfiguration {
                component: "random",
                reason: format!("level trigger {:?} has no latch form", self.trigger),
            });
        }
        let buf = HdlBuffer::new().pair("initSeed", format!("{:012X}", self.hdl_init_seed()));
        Ok(match dialect {
            Dialect::Vhdl => buf.add(
"q          <= s_currentSeed((width + 11) downto 12);
s_clock    <= clock when invertClock = 0 else not(clock);
s_initSeed <= x\"{{initSeed}}\";

makeSeed : process(s_clock, clear) is
begin
   if (clear = '1') then s_currentSeed <= s_initSeed;
   elsif (rising_edge(s_clock)) then
      if (enable = '1') then
         s_currentSeed <= std_logic_vector(resize(
            unsigned(s_currentSeed) * x\"5DEECE66D\" + x\"B\", 48));
      end if;
   end if;
end process makeSeed;"),
            Dialect::Verilog => buf.add(
"assign q          = s_currentSeed[(width + 11):12];
assign s_clock    = (invertClock == 0) ? clock : ~clock;
assign s_initSeed = 48'h{{initSeed}};

always @(posedge s_clock or posedge clear)
begin
   if (clear) s_currentSeed <= s_initSeed;
   else if (enable) s_currentSeed <= s_currentSeed * 48'h5DEECE66D + 48'hB;
end"),
        })
    }
}

impl HdlGenerator for TinyMtRng {
    fn declaration(&self) -> Module {
        let mut module = Module::new("tinyMtRng")
            .param("width", u64::from(self.bitsize()))
            .param("invertClock", self.trigger.clock_polarity())
            .input("clock", Width::Fixed(1))
            .input("clear", Width::Fixed(1))
            .input("enable", Width::Fixed(1))
            .output("q", Width::Param("width"))
            .wire("s_clock", Width::Fixed(1))
            .wire("s_shifted15", Width::Fixed(32))
            .wire("s_shifted18", Width::Fixed(32))
            .wire("s_stateNext", Width::Fixed(32))
            .wire("s_combined", Width::Fixed(64));
        for i in 0..4 {
            module = module.reg(format!("s_state{i}"), Width::Fixed(32));
        }
        module
    }

    fn body(&self, dialect: Dialect) -> Result<HdlBuffer, GenerationError> {
        if dialect == Dialect::Verilog {
            return Err(GenerationError::UnsupportedTarget {
                component: "tinyMtRng",
                dialect,
            });
        }
        if !self.trigger.is_edge() {
            return Err(GenerationError::InvalidConfiguration {
                component: "tinyMtRng",
                reason: format!("level trigger {:?} has no latch form", self.trigger),
            });
        }

        // The certified, warmed-up reset state for the configured seed.
        let [r0, r1, r2, r3] = TinyMtState::new(self.seed).state();
        Ok(HdlBuffer::new()
            .pair("reset0", format!("x\"{r0:08X}\""))
            .pair("reset1", format!("x\"{r1:08X}\""))
            .pair("reset2", format!("x\"{r2:08X}\""))
            .pair("reset3", format!("x\"{r3:08X}\""))
            .add(
"s_combined <= (s_state1 & s_state0) xor (s_state3 & s_state2);
q          <= s_combined((width - 1) downto 0);
s_clock    <= clock when invertClock = 0 else not(clock);

s_shifted15 <= s_state0 xor std_logic_vector(shift_left(unsigned(s_state0), 15));
s_shifted18 <= s_shifted15 xor std_logic_vector(shift_right(unsigned(s_shifted15), 18));
s_stateNext <= s_shifted18 xor std_logic_vector(shift_left(unsigned(s_state3), 11));

makeState : process(s_clock, clear) is
begin
   if (clear = '1') then
      s_state0 <= {{reset0}};
      s_state1 <= {{reset1}};
      s_state2 <= {{reset2}};
      s_state3 <= {{reset3}};
   elsif (rising_edge(s_clock)) then
      if (enable = '1') then
         s_state0 <= s_state1;
         s_state1 <= s_state2;
         s_state2 <= s_state3;
         s_state3 <= s_stateNext;
      end if;
   end if;
end process makeState;"))
    }
}

#[cfg(test)]
mod test {
    use crate::clock::Trigger;
    use crate::func::{Random, TinyMtRng};
    use crate::hdl::{Dialect, GenerationError, HdlGenerator};
    use crate::state::TinyMtState;

    #[test]
    fn lcg_verilog_uses_the_recurrence() {
        let text = Random::new(16, 0xBEEF).generate(Dialect::Verilog).unwrap();
        assert!(text.contains("assign s_initSeed = 48'h00000000BEEF;"));
        assert!(text.contains("s_currentSeed * 48'h5DEECE66D + 48'hB"));
        assert!(text.contains("assign q          = s_currentSeed[(width + 11):12];"));
    }

    #[test]
    fn lcg_zero_seed_falls_back_to_the_multiplier() {
        let text = Random::new(16, 0).generate(Dialect::Vhdl).unwrap();
        assert!(text.contains("s_initSeed <= x\"0005DEECE66D\";"));
    }

    #[test]
    fn lcg_output_slice_stays_inside_the_seed_register() {
        // The width cap keeps the tap range within the 48-bit seed.
        let text = Random::new(64, 1).generate(Dialect::Vhdl).unwrap();
        assert!(text.contains("width : integer := 32"));
        assert!(text.contains("q          <= s_currentSeed((width + 11) downto 12);"));
    }

    #[test]
    fn tinymt_vhdl_embeds_the_warmed_reset_state() {
        let rng = TinyMtRng::new(16, 42);
        let text = rng.generate(Dialect::Vhdl).unwrap();
        let [r0, ..] = TinyMtState::new(42).state();
        assert!(text.contains(&format!("s_state0 <= x\"{r0:08X}\";")));
        assert!(text.contains("shift_left(unsigned(s_state0), 15)"));
    }

    #[test]
    fn tinymt_has_no_verilog_mapping() {
        let rng = TinyMtRng::new(16, 42);
        assert_eq!(
            rng.generate(Dialect::Verilog),
            Err(GenerationError::UnsupportedTarget {
                component: "tinyMtRng",
                dialect: Dialect::Verilog,
            })
        );
    }

    #[test]
    fn lcg_rejects_level_trigger() {
        let mut rng = Random::new(16, 1);
        rng.trigger = Trigger::HighLevel;
        assert!(matches!(
            rng.generate(Dialect::Vhdl),
            Err(GenerationError::InvalidConfiguration { component: "random", .. })
        ));
    }
}
