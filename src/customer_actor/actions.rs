/// Custom actions for Customer entities.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerAction {
    /// Flags or unflags a customer registered by an operator.
    SetManual(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    SetManual(bool),
}
