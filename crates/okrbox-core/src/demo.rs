//! Demo plan for trying okrbox without a real export.
//!
//! One objective with three key results, two backlog actions per key result
//! spread over the next four weeks, evidence on the first two key results,
//! one weekly plan covering every key result, and one parked idea.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::calendar::{Calendar, DAY_MS};
use crate::plan::{Action, ActionStatus, Evidence, Idea, KeyResult, Objective, PlanSnapshot, WeeklyPlan, PARKING_STATUS};

/// (key result, title, estimated minutes, plan day counted from Monday, progress)
const ACTIONS: [(usize, &str, f64, i64, f64); 6] = [
    (0, "补充对照实验统计，产出价值验证结论", 90.0, 0, 50.0),
    (0, "汇总消费价值结论，沉淀 1 页结论 memo", 60.0, 11, 0.0),
    (1, "做漏斗分阶段转化对比分析", 90.0, 7, 40.0),
    (1, "梳理提效空间与算法策略建议", 60.0, 17, 0.0),
    (2, "验证搜索对供给撬动的边界条件", 90.0, 14, 20.0),
    (2, "形成冷启动链路方案初稿", 60.0, 24, 0.0),
];

const KEY_RESULTS: [(&str, f64, f64); 3] = [
    ("完成优质UGC价值验证结论", 30.0, 3.0),
    ("完成漏斗效率分析并明确提效空间", 20.0, 3.0),
    ("验证搜索对优质UGC供给的撬动上限", 10.0, 2.0),
];

const EVIDENCE: [(usize, &str, &str); 2] = [
    (0, "价值验证实验对照分析", "Experiment"),
    (1, "漏斗效率分析结果", "Dashboard"),
];

/// Length of each action's plan window.
const PLAN_DAYS: i64 = 4;
/// Key results fall due this many days after the start of the week.
const KR_DUE_DAYS: i64 = 26;
/// Time budget of the seeded weekly plan.
const WEEKLY_BUDGET_MINUTES: f64 = 600.0;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build the demo snapshot with plan dates anchored on the week containing `now`.
pub fn seed(now: DateTime<Utc>, calendar: &Calendar) -> PlanSnapshot {
    let week_start = calendar.week_start(now);
    let now_ms = now.timestamp_millis();

    let objective = Objective {
        id: new_id(),
        title: "O1 - 优质UGC搜索价值验证".to_string(),
        cycle: Some(cycle_label(calendar, now)),
    };

    let key_results: Vec<KeyResult> = KEY_RESULTS
        .iter()
        .map(|(title, progress, confidence)| KeyResult {
            id: new_id(),
            title: title.to_string(),
            progress: Some(*progress),
            confidence: Some(*confidence),
            due: Some(week_start + KR_DUE_DAYS * DAY_MS),
            objective_ids: vec![objective.id.clone()],
        })
        .collect();

    let actions: Vec<Action> = ACTIONS
        .iter()
        .map(|(kr, title, minutes, offset_days, progress)| {
            let plan_date = week_start + offset_days * DAY_MS;
            Action {
                id: new_id(),
                title: title.to_string(),
                status: ActionStatus::Backlog,
                est_minutes: Some(*minutes),
                plan_date: Some(plan_date),
                plan_start: Some(plan_date),
                plan_end: Some(plan_date + PLAN_DAYS * DAY_MS),
                progress: Some(*progress),
                key_result_ids: vec![key_results[*kr].id.clone()],
            }
        })
        .collect();

    let evidence = EVIDENCE
        .iter()
        .map(|(kr, title, kind)| Evidence {
            id: new_id(),
            title: title.to_string(),
            kind: Some(kind.to_string()),
            link: Some("https://example.com".to_string()),
            date: Some(now_ms),
            key_result_ids: vec![key_results[*kr].id.clone()],
            action_ids: vec![actions[kr * 2].id.clone()],
        })
        .collect();

    let weekly_plans = vec![WeeklyPlan {
        id: new_id(),
        title: "本周重点交付".to_string(),
        week_start: Some(week_start),
        deliverable: Some("完成价值验证结论 + 漏斗分析初稿".to_string()),
        risk: Some("实验样本不足影响结论稳定性".to_string()),
        time_budget_minutes: Some(WEEKLY_BUDGET_MINUTES),
        key_result_ids: key_results.iter().map(|kr| kr.id.clone()).collect(),
    }];

    let ideas = vec![Idea {
        id: new_id(),
        title: "探索优质UGC冷启动激励机制".to_string(),
        est_minutes: Some(120.0),
        status: Some(PARKING_STATUS.to_string()),
        notes: Some("等待结论后再评估是否转正".to_string()),
        key_result_ids: vec![key_results[2].id.clone()],
    }];

    PlanSnapshot {
        objectives: vec![objective],
        key_results,
        actions,
        evidence,
        ideas,
        weekly_plans,
        tasks: Vec::new(),
    }
}

fn cycle_label(calendar: &Calendar, now: DateTime<Utc>) -> String {
    let date = calendar.local_date(now);
    format!("{} Q{}", date.year(), date.month0() / 3 + 1)
}
