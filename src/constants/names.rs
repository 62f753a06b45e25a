/// membership prefixes in rank order, highest first
pub const CHANNEL_MEMBERSHIP_PREFIXES: &[char] = ['~', '&', '@', '%', '+'].as_slice();

pub const OP_PREFIX: char = '@';
pub const VOICE_PREFIX: char = '+';

/// channel mode letters that grant a membership prefix, paired with that prefix
pub const MODE_PREFIXES: &[(char, char)] = [
    ('q', '~'),
    ('a', '&'),
    ('o', OP_PREFIX),
    ('h', '%'),
    ('v', VOICE_PREFIX),
]
.as_slice();
