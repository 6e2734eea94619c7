use std::fmt;

use rust_fsm::state_machine;

/*
 * Home
 * Countdown (3, 2, 1)
 * Active
 *    Marcar palabras hasta agotar el mazo o el tiempo
 * Ended
 * Any stage can go back Home
 */
state_machine! {
    derive(Debug, Clone, Copy, PartialEq, Eq)
    pub RoundFsm(Home)

    Home => {
        Start => Countdown,
        GoHome => Home,
    },
    Countdown => {
        CountdownFinished => Active,
        GoHome => Home,
    },
    Active => {
        DeckExhausted => Ended,
        TimeUp => Ended,
        GoHome => Home,
    },
    Ended => {
        Restart => Home,
        GoHome => Home,
    }
}

impl fmt::Display for RoundFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
