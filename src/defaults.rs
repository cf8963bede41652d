//! Default-value propagation from the unit table to boards, and from boards to
//! their check-ins.

use crate::{
    models::{Board, CreateBoardRequest, CreateCheckInRequest, NewBoard, NewCheckIn},
    units,
};

/// board_from_request
///
/// Builds the insert for a new board. A quantitative board naming a known unit
/// and no explicit default takes the unit's default value and symbol from the
/// table. Unknown units keep whatever symbol was sent and get no default.
pub fn board_from_request(req: CreateBoardRequest) -> NewBoard {
    let is_quantity = req.is_quantity.unwrap_or(false);
    let mut board = NewBoard {
        name: req.name,
        is_quantity,
        default_value: req.default_value,
        unit: req.unit,
        unit_symbol: req.unit_symbol,
    };

    if is_quantity && board.default_value.is_none() {
        if let Some(unit) = board.unit.as_deref().and_then(units::unit_by_name) {
            board.default_value = Some(unit.default_value);
            board.unit_symbol = Some(unit.symbol.to_string());
        }
    }

    board
}

/// check_in_from_request
///
/// Builds the insert for a check-in on `board`, which the caller has already
/// resolved through the owner scope. Without an explicit value, a quantitative
/// board lends its default value, unit and symbol.
pub fn check_in_from_request(board: &Board, req: CreateCheckInRequest) -> NewCheckIn {
    let mut check_in = NewCheckIn {
        board_id: board.id,
        check_date: req.check_date,
        notes: req.notes,
        completed: req.completed.unwrap_or(true),
        value: req.value,
        unit: req.unit,
        unit_symbol: req.unit_symbol,
    };

    if board.is_quantity && check_in.value.is_none() {
        check_in.value = board.default_value;
        check_in.unit = board.unit.clone();
        check_in.unit_symbol = board.unit_symbol.clone();
    }

    check_in
}
