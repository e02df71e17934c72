// Score-keeping model for round-based card games.
//
// The `GameLedger` owns players, the committed round log and the open
// (pending) round. Totals, standings and the winner are derived from the
// round log on demand. Front ends hold a ledger, dispatch its operations and
// render `LedgerSnapshot`.

pub mod error;
pub mod ledger;
pub mod player;
pub mod round;
pub mod rules;
pub mod snapshot;

pub use error::LedgerError;
pub use ledger::{GameInfo, GameLedger, Phase, Standing};
pub use player::{Player, PlayerId};
pub use round::{Round, RoundId};
pub use rules::{LedgerRules, ScoreFloor, ScoreGoal, Variant};
pub use snapshot::LedgerSnapshot;
