/// The `flags` field of a LineDef
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineDefFlags {
    /// Solid, is an obstacle.
    Blocking = 1,
    /// Blocks monsters only.
    BlockMonsters = 2,
    /// Backside will not be present at all if not two sided.
    TwoSided = 4,
    /// upper texture unpegged
    UnpegTop = 8,
    /// lower texture unpegged
    UnpegBottom = 16,
    /// In AutoMap: don't map as two sided: IT'S A SECRET!
    Secret = 32,
    /// Sound rendering: don't let sound cross two of these.
    SoundBlock = 64,
    /// Don't draw on the automap at all.
    DontDraw = 128,
    /// Set if already seen, thus drawn in automap.
    Mapped = 256,
}
