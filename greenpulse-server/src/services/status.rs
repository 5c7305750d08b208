use crate::models::room::RoomStatus;

/// Derives a room's status from its occupancy and fixture state.
///
/// A room with anyone in it is occupied; an empty room with lights or air
/// conditioning left on is wasting energy; anything else is empty.
pub fn determine_status(occupancy: u32, lights_on: bool, ac_on: bool) -> RoomStatus {
    if occupancy > 0 {
        RoomStatus::Occupied
    } else if lights_on || ac_on {
        RoomStatus::Waste
    } else {
        RoomStatus::Empty
    }
}
