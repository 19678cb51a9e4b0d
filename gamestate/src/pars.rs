//! Par times and the map that follows a completed one.

use gameplay::{GameMission, GameMode, TICRATE};

/// Doom 1 par times in seconds, by episode then map. Row 0 and column 0 are
/// unused.
const PARS: [[i32; 10]; 5] = [
    [0; 10],
    [0, 30, 75, 120, 90, 165, 180, 180, 30, 165],
    [0, 90, 90, 90, 120, 90, 360, 240, 30, 170],
    [0, 90, 45, 90, 150, 90, 90, 165, 30, 135],
    [0, 165, 255, 135, 150, 180, 390, 135, 360, 180],
];

/// Doom 2 par times in seconds
const CPARS: [i32; 33] = [
    30, 90, 120, 120, 90, 150, 120, 120, 270, 90, // 1-10
    210, 150, 150, 150, 210, 150, 420, 150, 210, 150, // 11-20
    240, 150, 180, 150, 150, 300, 330, 420, 300, 180, // 21-30
    120, 30, 0, // 31-33
];

/// No Rest for the Living par times in seconds
const NPARS: [i32; 9] = [75, 105, 120, 105, 210, 105, 165, 105, 135];

/// Where the game goes after finishing `map`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMap {
    /// Zero based index of the next map
    Map(i32),
    /// Keep whatever was routed to last time
    Unchanged,
    /// End of the episode, straight to the finale
    Victory,
}

/// Doom function `G_DoCompleted`, the routing part. `next` is zero based like
/// the intermission's, `map` and `episode` are not.
pub fn next_map_after(
    mode: GameMode,
    mission: GameMission,
    episode: i32,
    map: i32,
    secret_exit: bool,
) -> NextMap {
    if mode == GameMode::Commercial {
        let nerve = mission == GameMission::PackNerve;
        if secret_exit {
            return match map {
                2 => NextMap::Map(32),
                4 if nerve => NextMap::Map(8),
                15 => NextMap::Map(30),
                31 => NextMap::Map(31),
                _ => NextMap::Unchanged,
            };
        }
        return match map {
            9 if nerve => NextMap::Map(4),
            31 | 32 => NextMap::Map(15),
            33 => NextMap::Map(2),
            _ => NextMap::Map(map),
        };
    }

    if map == 8 {
        return NextMap::Victory;
    }
    if secret_exit {
        return NextMap::Map(8);
    }
    if map == 9 {
        // returning from secret level
        return match episode {
            1 => NextMap::Map(3),
            2 => NextMap::Map(5),
            3 => NextMap::Map(6),
            4 => NextMap::Map(2),
            _ => NextMap::Unchanged,
        };
    }
    NextMap::Map(map)
}

/// Par time in tics. `replaced` is true when a PWAD carries its own copy of
/// the map, such maps get no par.
pub fn par_time(
    mode: GameMode,
    mission: GameMission,
    episode: i32,
    map: i32,
    replaced: bool,
) -> i32 {
    let nerve = mission == GameMission::PackNerve;
    if replaced && (!nerve || map > 9) {
        return 0;
    }
    let secs = if mode != GameMode::Commercial {
        PARS.get(episode as usize)
            .and_then(|row| row.get(map as usize))
            .copied()
            .unwrap_or(0)
    } else if nerve && map <= 9 {
        map.checked_sub(1)
            .and_then(|m| NPARS.get(m as usize))
            .copied()
            .unwrap_or(0)
    } else if matches!(mission, GameMission::PackTnt | GameMission::PackPlut) {
        0
    } else {
        map.checked_sub(1)
            .and_then(|m| CPARS.get(m as usize))
            .copied()
            .unwrap_or(0)
    };
    secs * TICRATE
}

#[cfg(test)]
mod tests {
    use gameplay::{GameMission, GameMode, TICRATE};

    use super::{NextMap, next_map_after, par_time};

    #[test]
    fn doom_routing() {
        let route = |ep, map, secret| {
            next_map_after(GameMode::Registered, GameMission::Doom, ep, map, secret)
        };
        assert_eq!(route(1, 3, true), NextMap::Map(8));
        assert_eq!(route(1, 3, false), NextMap::Map(3));
        assert_eq!(route(1, 8, false), NextMap::Victory);
        assert_eq!(route(1, 9, false), NextMap::Map(3));
        assert_eq!(route(2, 9, false), NextMap::Map(5));
        assert_eq!(route(3, 9, false), NextMap::Map(6));
        assert_eq!(route(4, 9, false), NextMap::Map(2));
        assert_eq!(route(5, 9, false), NextMap::Unchanged);
    }

    #[test]
    fn doom2_routing() {
        let route = |map, secret| {
            next_map_after(GameMode::Commercial, GameMission::Doom2, 1, map, secret)
        };
        assert_eq!(route(15, true), NextMap::Map(30));
        assert_eq!(route(31, true), NextMap::Map(31));
        assert_eq!(route(2, true), NextMap::Map(32));
        assert_eq!(route(5, true), NextMap::Unchanged);
        assert_eq!(route(4, true), NextMap::Unchanged);
        assert_eq!(route(31, false), NextMap::Map(15));
        assert_eq!(route(32, false), NextMap::Map(15));
        assert_eq!(route(33, false), NextMap::Map(2));
        assert_eq!(route(9, false), NextMap::Map(9));
        assert_eq!(route(7, false), NextMap::Map(7));
    }

    #[test]
    fn nerve_routing() {
        let route = |map, secret| {
            next_map_after(GameMode::Commercial, GameMission::PackNerve, 1, map, secret)
        };
        assert_eq!(route(4, true), NextMap::Map(8));
        assert_eq!(route(9, false), NextMap::Map(4));
    }

    #[test]
    fn pars() {
        let doom = |ep, map| par_time(GameMode::Retail, GameMission::Doom, ep, map, false);
        assert_eq!(doom(1, 1), 30 * TICRATE);
        assert_eq!(doom(4, 6), 390 * TICRATE);
        assert_eq!(
            par_time(GameMode::Commercial, GameMission::Doom2, 1, 32, false),
            30 * TICRATE
        );
        assert_eq!(
            par_time(GameMode::Commercial, GameMission::PackNerve, 1, 5, true),
            210 * TICRATE
        );
        assert_eq!(
            par_time(GameMode::Commercial, GameMission::PackTnt, 1, 5, false),
            0
        );
        assert_eq!(par_time(GameMode::Retail, GameMission::Doom, 1, 1, true), 0);
    }
}
