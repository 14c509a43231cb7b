//! 联机测试：需要本地跑着语料库服务器（默认 http://localhost:5000）
//!
//! 默认忽略，需要手动运行：cargo test -- --ignored

use locus_picker::config::Config;
use locus_picker::models::locus::NO_LOCUS;
use locus_picker::models::{AuthorId, Locus, WorkId};
use locus_picker::picker::{LevelState, LocusResolver, PickerCtx, Track};
use locus_picker::services::{HintService, StructureService};
use locus_picker::utils::logging;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_author_hint_returns_parsable_ids() {
    logging::init();
    let config = Config::from_env();

    let hints = HintService::new(&config).expect("创建补全服务失败");
    let authors = hints.search_authors("verg").await.expect("作者检索失败");

    assert!(!authors.is_empty(), "应该能检索到作者");
    for value in &authors {
        assert!(
            AuthorId::from_hint_value(value).is_some(),
            "候选值应该都带作者编号: {}",
            value
        );
    }
}

#[tokio::test]
#[ignore]
async fn test_structure_roundtrip_level_arithmetic() {
    // 性质：用已选层数 d 的 locus 回查，响应层级必须等于 totallevels - 1 - d
    logging::init();
    let config = Config::from_env();

    let service = StructureService::new(&config).expect("创建结构服务失败");
    let author = AuthorId::parse("lt1254").expect("作者编号非法");
    let work = WorkId::parse("001").expect("作品编号非法");

    let (_ticket, top) = service
        .fetch(&author, &work, NO_LOCUS)
        .await
        .expect("查询最粗层级失败");
    assert_eq!(top.level, top.totallevels - 1);
    assert!(!top.range.is_empty(), "最粗层级应该有候选值");

    // 逐层选第一个候选值再回查
    let mut locus = Locus::new(top.totallevels);
    locus.set(top.level, &top.range[0]).expect("选定最粗层级失败");

    let mut next_level = top.level;
    while next_level > 0 {
        let (_ticket, ws) = service
            .fetch(&author, &work, &locus.serialize())
            .await
            .expect("回查下一层级失败");
        assert_eq!(ws.level, ws.totallevels - 1 - locus.depth());
        next_level = ws.level;
        if ws.range.is_empty() {
            break;
        }
        if next_level > 0 {
            locus.set(next_level, &ws.range[0]).expect("选定层级失败");
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_full_drill_to_finest_level() {
    logging::init();
    let config = Config::from_env();

    let mut resolver = LocusResolver::new(&config).expect("创建解析器失败");
    let author = AuthorId::parse("lt1254").expect("作者编号非法");
    let work = WorkId::parse("001").expect("作品编号非法");
    let ctx = PickerCtx::new(author, work, "测试作者".to_string());

    assert!(resolver.start(ctx).await.expect("披露最粗层级失败"));
    let total = resolver.panel().total_levels().expect("层级总数未知");

    // 每层都选第一个候选值，一路钻到最细层级
    for level in (0..total).rev() {
        let value = {
            let field = resolver.panel().field(Track::Primary, level);
            assert_eq!(field.state, LevelState::Pending, "层级 {} 应该处于待选状态", level);
            assert!(!field.options.is_empty(), "层级 {} 的候选列表为空", level);
            field.options[0].clone()
        };
        resolver
            .select_value(Track::Primary, level, &value)
            .await
            .expect("选定层级值失败");
    }

    assert_eq!(resolver.panel().depth(Track::Primary), total);
    let locus = resolver.panel().serialized_locus(Track::Primary);
    assert_eq!(locus.split('|').count(), total);
    println!("钻取完成: {}", locus);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_requests_keep_latest() {
    // 两个请求并发在途时，界面必须反映最后发出的那个：
    // 先为 "第一卷" 领票发请求，再为 "第一卷第一段" 领票发请求，
    // 不论响应到达顺序如何，后者先落盘之后前者必须被丢弃
    logging::init();
    let config = Config::from_env();

    let service = StructureService::new(&config).expect("创建结构服务失败");
    let author = AuthorId::parse("lt1254").expect("作者编号非法");
    let work = WorkId::parse("001").expect("作品编号非法");

    let (_ticket, top) = service
        .fetch(&author, &work, NO_LOCUS)
        .await
        .expect("查询最粗层级失败");
    let first = top.range.first().expect("最粗层级没有候选值").clone();

    let (coarse, fine) = futures::join!(
        service.fetch(&author, &work, NO_LOCUS),
        service.fetch(&author, &work, &first)
    );
    let (coarse_ticket, coarse_ws) = coarse.expect("粗层级查询失败");
    let (fine_ticket, fine_ws) = fine.expect("细层级查询失败");

    let mut panel = locus_picker::PickerPanel::new();
    // 新票先落盘，旧票必须被丢弃
    let (newer, older) = if fine_ticket > coarse_ticket {
        ((fine_ticket, fine_ws), (coarse_ticket, coarse_ws))
    } else {
        ((coarse_ticket, coarse_ws), (fine_ticket, fine_ws))
    };
    assert!(panel
        .apply_structure(Track::Primary, newer.0, &newer.1)
        .expect("应用新响应失败"));
    assert!(!panel
        .apply_structure(Track::Primary, older.0, &older.1)
        .expect("旧响应应该被丢弃而不是报错"));
}
