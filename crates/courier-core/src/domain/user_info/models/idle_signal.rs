// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

/// A boolean signal that turns on with activity and turns itself off again once no activity was
/// registered for a while.
///
/// The signal itself has no notion of time. Every call to `touch` returns a generation. The owner
/// schedules a timer for that generation and calls `expire` when it fires. Only the timer of the
/// latest touch is able to turn the signal off.
#[derive(Debug, Default)]
pub struct IdleSignal {
    is_on: bool,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTouch {
    /// The signal was off before and the "on" state needs to be announced.
    pub turned_on: bool,
    pub generation: u64,
}

impl IdleSignal {
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn touch(&mut self) -> SignalTouch {
        self.generation += 1;
        let turned_on = !self.is_on;
        self.is_on = true;

        SignalTouch {
            turned_on,
            generation: self.generation,
        }
    }

    /// Turns the signal off if no touch happened since `generation`. Returns true if the signal
    /// was turned off and the "off" state needs to be announced.
    pub fn expire(&mut self, generation: u64) -> bool {
        if !self.is_on || generation != self.generation {
            return false;
        }
        self.is_on = false;
        true
    }

    /// Turns the signal off immediately and invalidates all pending timers.
    pub fn reset(&mut self) -> bool {
        self.generation += 1;
        std::mem::replace(&mut self.is_on, false)
    }
}
