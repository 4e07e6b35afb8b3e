use proptest::{prop_assert_eq, proptest};
use strum::IntoEnumIterator;

use super::{LexState, StackState};

#[test]
fn state_classes() {
    for state in LexState::iter() {
        // an expression cannot both be starting and have just ended
        assert!(!(state.is_beg() && state.is_end()), "{state:?}");
        assert_eq!(
            state.arg_state() == LexState::Arg,
            state.in_arg_state(),
            "{state:?}"
        );
    }

    assert!(LexState::Mid.is_beg());
    assert!(LexState::Label.is_beg());
    assert!(LexState::EndArg.is_end());
    assert!(LexState::CmdArg.is_arg());
    assert!(!LexState::Dot.is_arg());
}

#[test]
fn lexpop_folds_into_the_new_top() {
    let mut stack = StackState::new();
    stack.push(false);
    stack.push(true);
    stack.lexpop();

    assert!(stack.is_in_state());
    assert_eq!(stack.depth(), 1);
}

#[test]
fn empty_stack_is_not_in_state() {
    let mut stack = StackState::new();
    assert!(!stack.is_in_state());
    assert_eq!(stack.pop(), None);

    stack.lexpop();
    assert_eq!(stack.depth(), 0);
}

proptest! {
    #[test]
    fn push_then_pop_restores(
        levels in proptest::collection::vec(proptest::bool::ANY, 0..16),
        value: bool,
    ) {
        let mut stack = StackState::new();
        for level in &levels {
            stack.push(*level);
        }
        let before = stack.clone();

        stack.push(value);
        prop_assert_eq!(stack.is_in_state(), value);
        prop_assert_eq!(stack.pop(), Some(value));
        prop_assert_eq!(stack, before);
    }
}
