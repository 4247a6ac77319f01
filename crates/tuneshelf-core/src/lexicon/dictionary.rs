//! Built-in romanized fragment -> native script table.
//!
//! Keys are lowercase ASCII. Values that are themselves ASCII must be the
//! title-cased form of their key so that translating a translation is a no-op.

pub(crate) const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // Whole titles written with spaces
    ("jay chou", "周杰伦"),
    ("gao bai qi qiu", "告白气球"),
    ("dong feng po", "东风破"),
    ("qing hua ci", "青花瓷"),
    ("qi li xiang", "七里香"),
    ("yue liang dai biao wo de xin", "月亮代表我的心"),
    ("wo ai ni", "我爱你"),
    // Artists
    ("zhoujielun", "周杰伦"),
    ("linjunjie", "林俊杰"),
    ("chenyixun", "陈奕迅"),
    ("dengziqi", "邓紫棋"),
    ("wangfei", "王菲"),
    ("ziye", "子夜"),
    ("liangjingru", "梁静茹"),
    ("maobuyi", "毛不易"),
    ("xuezhiqian", "薛之谦"),
    ("zhangxueyou", "张学友"),
    ("liudehua", "刘德华"),
    ("wuyuetian", "五月天"),
    ("denglijun", "邓丽君"),
    ("lironghao", "李荣浩"),
    // Titles
    ("zhebeizi", "这辈子"),
    ("qingtian", "晴天"),
    ("daoxiang", "稻香"),
    ("qilixiang", "七里香"),
    ("yequ", "夜曲"),
    ("qinghuaci", "青花瓷"),
    ("dongfengpo", "东风破"),
    ("gaobaiqiqiu", "告白气球"),
    ("houlai", "后来"),
    ("shinian", "十年"),
    ("hongdou", "红豆"),
    ("xiaoxingxing", "小星星"),
    ("xiaoqingge", "小情歌"),
    ("pengyou", "朋友"),
    ("tiantang", "天堂"),
    ("yanyuan", "演员"),
    ("choubaguai", "丑八怪"),
    // Words
    ("aiqing", "爱情"),
    ("shanggan", "伤感"),
    ("xiangnian", "想念"),
    ("sinian", "思念"),
    ("wanan", "晚安"),
    ("qingge", "情歌"),
    ("yueyu", "粤语"),
    ("guoyu", "国语"),
    ("banzou", "伴奏"),
    ("chunyinyue", "纯音乐"),
    ("gangqin", "钢琴"),
    ("gufeng", "古风"),
    ("xianchang", "现场"),
    ("dianyin", "电音"),
    ("ai", "爱"),
    ("ni", "你"),
    ("wo", "我"),
    ("de", "的"),
    // Version markers
    ("remix", "Remix"),
    ("live", "Live"),
    ("dj", "DJ"),
    ("mv", "MV"),
];
