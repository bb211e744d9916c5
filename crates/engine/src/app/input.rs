#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Fire,
    Reload,
    Shove,
    SwitchWeapon,
    UseThrowable,
    UseShockThrowable,
    UseHealItem,
    SpecialAbility,
    ToggleFaction,
    TogglePause,
    Quit,
}

const ACTION_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_pressed: bool) {
        self.pressed[action.index()] = is_pressed;
    }

    pub(crate) fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::Fire,
        InputAction::Reload,
        InputAction::Shove,
        InputAction::SwitchWeapon,
        InputAction::UseThrowable,
        InputAction::UseShockThrowable,
        InputAction::UseHealItem,
        InputAction::SpecialAbility,
        InputAction::ToggleFaction,
        InputAction::TogglePause,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::Fire => 0,
            InputAction::Reload => 1,
            InputAction::Shove => 2,
            InputAction::SwitchWeapon => 3,
            InputAction::UseThrowable => 4,
            InputAction::UseShockThrowable => 5,
            InputAction::UseHealItem => 6,
            InputAction::SpecialAbility => 7,
            InputAction::ToggleFaction => 8,
            InputAction::TogglePause => 9,
            InputAction::Quit => 10,
        }
    }
}
