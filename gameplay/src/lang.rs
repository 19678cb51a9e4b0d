//! Player facing text. Only English is carried.

pub mod english {
    pub const GOTARMOR: &str = "Picked up the armor.";
    pub const GOTMEGA: &str = "Picked up the MegaArmor!";
    pub const GOTHTHBONUS: &str = "Picked up a health bonus.";
    pub const GOTARMBONUS: &str = "Picked up an armor bonus.";
    pub const GOTSTIM: &str = "Picked up a stimpack.";
    pub const GOTMEDINEED: &str = "Picked up a medikit that you REALLY need!";
    pub const GOTMEDIKIT: &str = "Picked up a medikit.";
    pub const GOTSUPER: &str = "Supercharge!";
    pub const GOTMSPHERE: &str = "MegaSphere!";

    pub const GOTBLUECARD: &str = "Picked up a blue keycard.";
    pub const GOTYELWCARD: &str = "Picked up a yellow keycard.";
    pub const GOTREDCARD: &str = "Picked up a red keycard.";
    pub const GOTBLUESKUL: &str = "Picked up a blue skull key.";
    pub const GOTYELWSKUL: &str = "Picked up a yellow skull key.";
    pub const GOTREDSKULL: &str = "Picked up a red skull key.";

    pub const GOTINVUL: &str = "Invulnerability!";
    pub const GOTBERSERK: &str = "Berserk!";
    pub const GOTINVIS: &str = "Partial Invisibility";
    pub const GOTSUIT: &str = "Radiation Shielding Suit";
    pub const GOTMAP: &str = "Computer Area Map";
    pub const GOTVISOR: &str = "Light Amplification Visor";

    pub const GOTCLIP: &str = "Picked up a clip.";
    pub const GOTCLIPBOX: &str = "Picked up a box of bullets.";
    pub const GOTROCKET: &str = "Picked up a rocket.";
    pub const GOTROCKBOX: &str = "Picked up a box of rockets.";
    pub const GOTCELL: &str = "Picked up an energy cell.";
    pub const GOTCELLBOX: &str = "Picked up an energy cell pack.";
    pub const GOTSHELLS: &str = "Picked up 4 shotgun shells.";
    pub const GOTSHELLBOX: &str = "Picked up a box of shotgun shells.";
    pub const GOTBACKPACK: &str = "Picked up a backpack full of ammo!";

    pub const GOTBFG9000: &str = "You got the BFG9000!  Oh, yes.";
    pub const GOTCHAINGUN: &str = "You got the chaingun!";
    pub const GOTCHAINSAW: &str = "A chainsaw!  Find some meat!";
    pub const GOTLAUNCHER: &str = "You got the rocket launcher!";
    pub const GOTPLASMA: &str = "You got the plasma gun!";
    pub const GOTSHOTGUN: &str = "You got the shotgun!";
    pub const GOTSHOTGUN2: &str = "You got the super shotgun!";

    /// Follows the quoted save description
    pub const GGSAVED: &str = "saved.";
    pub const NETGAME_DESCRIPTION: &str = "NET GAME";
    /// Player colours, as used in the turbo warning
    pub const PLAYER_NAMES: [&str; 4] = ["Green", "Indigo", "Brown", "Red"];
    pub const TURBO_SUFFIX: &str = " is turbo!";
}
