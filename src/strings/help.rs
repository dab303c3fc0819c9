//! # Help Text
//!
//! detailed help messages and documentation for bot commands.
//! Displayed to the user via the `.help` command.

pub const MAIN: &str = concat!(
    "**🌱 Gardenwatch Help**\n",
    "Use: .command _args_\n",
    "\n",
    "**🛒 Stock**\n",
    "* stock start [shop]: Track a shop in this room\n",
    "* stock stop: Stop the room's stock tracker\n",
    "  Shops: seed_stock, gear_stock, egg_stock, cosmetic_stock, eventshop_stock\n",
    "\n",
    "**⛅ Weather**\n",
    "* weather start: Track weather events in this room\n",
    "* weather stop: Stop the room's weather tracker\n",
    "\n",
    "**⚡ Misc**\n",
    "* purge: Delete my recent messages in this room\n",
    "* help: This text\n"
);
