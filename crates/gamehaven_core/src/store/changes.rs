//! Table identifiers published on the store change bus.

use std::fmt::{Display, Formatter};

/// One storefront table. Writes publish every table whose rows they may have
/// touched, cascades included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Games,
    Transactions,
    TransactionDetails,
    PurchasedGames,
    DownloadHistory,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Users,
        Table::Games,
        Table::Transactions,
        Table::TransactionDetails,
        Table::PurchasedGames,
        Table::DownloadHistory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Games => "games",
            Self::Transactions => "transactions",
            Self::TransactionDetails => "transaction_details",
            Self::PurchasedGames => "purchased_games",
            Self::DownloadHistory => "download_history",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tables touched by deleting a user: the row itself plus FK cascades.
pub const USER_DELETE_TABLES: &[Table] = &[
    Table::Users,
    Table::Transactions,
    Table::TransactionDetails,
    Table::PurchasedGames,
];

/// Tables touched by deleting a game: the row itself plus FK cascades.
pub const GAME_DELETE_TABLES: &[Table] = &[
    Table::Games,
    Table::TransactionDetails,
    Table::PurchasedGames,
];

/// Tables written by the purchase flow.
pub const PURCHASE_TABLES: &[Table] = &[
    Table::Transactions,
    Table::TransactionDetails,
    Table::PurchasedGames,
];

/// Tables written by a download status change.
pub const DOWNLOAD_STATUS_TABLES: &[Table] = &[Table::PurchasedGames, Table::DownloadHistory];
