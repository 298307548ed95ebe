use metrics_exporter_prometheus::PrometheusHandle;
use recruitment_eval::workflows::recruitment::{
    AuditEntry, AuditError, AuditTrail, Candidate, CandidateDecision, CandidateId,
    EvaluationPhase, EvaluationRepository, FaceToFaceScore, JobFamily, JurorRole, JuryMemberId,
    RepositoryError, SessionId, SessionJuror, TechnicalScores,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type ScoreKey = (CandidateId, JuryMemberId, EvaluationPhase);

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    candidates: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
    sessions: Arc<Mutex<HashMap<SessionId, Vec<SessionJuror>>>>,
    scores: Arc<Mutex<HashMap<ScoreKey, FaceToFaceScore>>>,
    technical: Arc<Mutex<HashMap<CandidateId, TechnicalScores>>>,
    decisions: Arc<Mutex<HashMap<CandidateId, CandidateDecision>>>,
}

impl InMemoryEvaluationRepository {
    pub(crate) fn insert_session(
        &self,
        id: SessionId,
        roster: Vec<SessionJuror>,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions)?;
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, roster);
        Ok(())
    }

    pub(crate) fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.candidates)?;
        if guard.contains_key(&candidate.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(candidate.id.clone(), candidate);
        Ok(())
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(lock(&self.candidates)?.get(id).cloned())
    }

    fn session_roster(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Vec<SessionJuror>>, RepositoryError> {
        Ok(lock(&self.sessions)?.get(session_id).cloned())
    }

    fn face_to_face_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FaceToFaceScore>, RepositoryError> {
        let guard = lock(&self.scores)?;
        let mut scores: Vec<FaceToFaceScore> = guard
            .values()
            .filter(|score| &score.candidate_id == candidate_id)
            .cloned()
            .collect();
        scores.sort_by(|a, b| a.evaluated_at.cmp(&b.evaluated_at));
        Ok(scores)
    }

    fn upsert_face_to_face(
        &self,
        score: FaceToFaceScore,
    ) -> Result<FaceToFaceScore, RepositoryError> {
        let key = (
            score.candidate_id.clone(),
            score.jury_member_id.clone(),
            score.phase,
        );
        lock(&self.scores)?.insert(key, score.clone());
        Ok(score)
    }

    fn technical_scores(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<TechnicalScores>, RepositoryError> {
        Ok(lock(&self.technical)?.get(candidate_id).cloned())
    }

    fn upsert_technical_scores(
        &self,
        candidate_id: &CandidateId,
        scores: TechnicalScores,
    ) -> Result<(), RepositoryError> {
        lock(&self.technical)?.insert(candidate_id.clone(), scores);
        Ok(())
    }

    fn save_decision(&self, decision: CandidateDecision) -> Result<(), RepositoryError> {
        lock(&self.decisions)?.insert(decision.candidate_id.clone(), decision);
        Ok(())
    }

    fn decision(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<CandidateDecision>, RepositoryError> {
        Ok(lock(&self.decisions)?.get(candidate_id).cloned())
    }
}

/// Audit trail that keeps entries in memory and mirrors them to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditTrail {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditTrail for InMemoryAuditTrail {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            action = ?entry.action,
            candidate = %entry.candidate_id,
            "audit entry recorded"
        );
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AuditError::Transport("audit mutex poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }
}

impl InMemoryAuditTrail {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) const DEMO_SESSION: &str = "demo-session";

fn demo_juror(
    id: &str,
    name: &str,
    role_type: JurorRole,
    specialite: Option<JobFamily>,
    was_present: bool,
) -> SessionJuror {
    SessionJuror {
        jury_member_id: JuryMemberId(id.to_string()),
        full_name: name.to_string(),
        role_type,
        specialite,
        was_present,
    }
}

pub(crate) fn demo_roster() -> Vec<SessionJuror> {
    vec![
        demo_juror("drh-01", "Leila Amrani", JurorRole::Drh, None, true),
        demo_juror("epc-01", "Omar Chraibi", JurorRole::Epc, None, true),
        demo_juror(
            "rm-agences-01",
            "Sara El Fassi",
            JurorRole::RepresentantMetier,
            Some(JobFamily::Agences),
            true,
        ),
        demo_juror(
            "rm-televente-01",
            "Mehdi Lahlou",
            JurorRole::RepresentantMetier,
            Some(JobFamily::Televente),
            true,
        ),
        demo_juror("wfm-01", "Rania Ziani", JurorRole::WfmJury, None, false),
    ]
}

pub(crate) fn demo_candidates() -> Vec<Candidate> {
    [
        ("cand-agences-01", "Yasmine Berrada", JobFamily::Agences),
        ("cand-televente-01", "Anas Kettani", JobFamily::Televente),
        ("cand-callcenter-01", "Hiba Naciri", JobFamily::CallCenter),
        ("cand-boreclam-01", "Adil Sqalli", JobFamily::BoReclam),
    ]
    .into_iter()
    .map(|(id, name, job_family)| Candidate {
        id: CandidateId(id.to_string()),
        session_id: SessionId(DEMO_SESSION.to_string()),
        full_name: name.to_string(),
        job_family,
    })
    .collect()
}

/// Register the demo session and its candidates so the HTTP surface can be exercised.
pub(crate) fn seed_demo_data(
    repository: &InMemoryEvaluationRepository,
) -> Result<(), RepositoryError> {
    repository.insert_session(SessionId(DEMO_SESSION.to_string()), demo_roster())?;
    for candidate in demo_candidates() {
        repository.insert_candidate(candidate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_twice_conflicts() {
        let repository = InMemoryEvaluationRepository::default();
        seed_demo_data(&repository).expect("first seed");

        assert!(matches!(
            seed_demo_data(&repository),
            Err(RepositoryError::Conflict)
        ));
        let roster = repository
            .session_roster(&SessionId(DEMO_SESSION.to_string()))
            .expect("roster loads")
            .expect("session present");
        assert_eq!(roster.len(), 5);
    }
}
