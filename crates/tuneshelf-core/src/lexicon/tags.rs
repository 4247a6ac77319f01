//! Built-in keyword vocabulary for tag inference.
//!
//! Rules fire in declaration order; keywords are matched case-insensitively
//! against the title and artist.

pub(crate) const BUILTIN_TAG_RULES: &[(&str, &[&str])] = &[
    ("#DJ", &["dj", "remix", "edm", "电音", "慢摇", "dianyin"]),
    (
        "#伤感",
        &["伤感", "心碎", "眼泪", "离别", "分手", "sad", "shanggan"],
    ),
    ("#情歌", &["情歌", "爱情", "love", "qingge", "aiqing"]),
    ("#粤语", &["粤语", "cantonese", "yueyu"]),
    (
        "#古风",
        &["古风", "国风", "青花瓷", "东风破", "gufeng", "qinghuaci", "dongfengpo"],
    ),
    ("#说唱", &["说唱", "嘻哈", "rap", "hiphop", "hip-hop"]),
    ("#摇滚", &["摇滚", "rock"]),
    (
        "#纯音乐",
        &["纯音乐", "伴奏", "钢琴", "instrumental", "piano", "chunyinyue", "banzou"],
    ),
    ("#Live", &["live", "现场", "演唱会", "concert", "xianchang"]),
    ("#经典", &["经典", "老歌", "怀旧", "classic"]),
];
